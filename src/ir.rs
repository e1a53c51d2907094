use crate::error::{ErrorKind, TransformError, TransformResult};
use serde_json::{json, Map, Value};

pub const FOREVER_OPCODE: &str = "control_forever";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Sprite,
    Local(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub scope: Scope,
}

impl Variable {
    pub fn sprite(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: Scope::Sprite,
        }
    }

    /// A procedure local, stored as the sprite cell `<procedure>.<name>`.
    pub fn local(procedure: &str, name: &str) -> Self {
        Self {
            name: format!("{}.{}", procedure, name),
            scope: Scope::Local(procedure.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub name: String,
}

impl List {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Literal(String),
    Block(Box<Block>),
    Stack(Stack),
    Variable(Variable),
    List(List),
    Argument(Argument),
}

impl Input {
    pub fn literal(value: impl Into<String>) -> Self {
        Input::Literal(value.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Input::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Input::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&Stack> {
        match self {
            Input::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Input::Literal(value) => Value::String(value.clone()),
            Input::Block(block) => block.to_json(),
            Input::Stack(stack) => stack.to_json(),
            Input::Variable(variable) => json!({ "variable": variable.name }),
            Input::List(list) => json!({ "list": list.name }),
            Input::Argument(argument) => json!({ "argument": argument.name }),
        }
    }
}

impl From<Block> for Input {
    fn from(block: Block) -> Self {
        Input::Block(Box::new(block))
    }
}

impl From<Stack> for Input {
    fn from(stack: Stack) -> Self {
        Input::Stack(stack)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Variable(Variable),
    List(List),
    /// A broadcast, key or backdrop option; the serializer pairs it with an id.
    Named(String),
}

impl FieldValue {
    fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Variable(variable) => json!({ "variable": variable.name }),
            FieldValue::List(list) => json!({ "list": list.name }),
            FieldValue::Named(name) => json!({ "named": name }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub opcode: String,
    pub inputs: Vec<(String, Input)>,
    pub fields: Vec<(String, FieldValue)>,
    pub comment: Option<String>,
}

impl Block {
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            opcode: opcode.into(),
            inputs: Vec::new(),
            fields: Vec::new(),
            comment: None,
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, input: impl Into<Input>) -> Self {
        self.inputs.push((name.into(), input.into()));
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FieldValue) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, input)| input)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    pub fn to_json(&self) -> Value {
        let mut out = json!({
            "opcode": self.opcode,
            "inputs": inputs_json(&self.inputs),
            "fields": fields_json(&self.fields),
        });
        if let (Some(comment), Value::Object(map)) = (&self.comment, &mut out) {
            map.insert("comment".to_string(), Value::String(comment.clone()));
        }
        out
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Literal(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcCall {
    pub name: String,
    pub arguments: Vec<(String, Input)>,
    pub warp: bool,
    pub comment: Option<String>,
    pub proccode: String,
}

impl ProcCall {
    pub fn argument(&self, formal: &str) -> Option<&Input> {
        self.arguments
            .iter()
            .find(|(key, _)| key == formal)
            .map(|(_, input)| input)
    }

    pub fn to_json(&self) -> Value {
        let mut out = json!({
            "opcode": "procedures_call",
            "proccode": self.proccode,
            "warp": self.warp,
            "arguments": inputs_json(&self.arguments),
        });
        if let (Some(comment), Value::Object(map)) = (&self.comment, &mut out) {
            map.insert("comment".to_string(), Value::String(comment.clone()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Call(ProcCall),
}

impl Node {
    pub fn opcode(&self) -> &str {
        match self {
            Node::Block(block) => &block.opcode,
            Node::Call(_) => "procedures_call",
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Call(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Node::Block(block) => block.to_json(),
            Node::Call(call) => call.to_json(),
        }
    }
}

/// A statement sequence. Nothing may follow a `forever` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stack {
    nodes: Vec<Node>,
}

impl Stack {
    pub fn new(nodes: Vec<Node>) -> TransformResult<Self> {
        let last = nodes.len().saturating_sub(1);
        if let Some(index) = nodes
            .iter()
            .position(|node| node.opcode() == FOREVER_OPCODE)
        {
            if index != last {
                return Err(TransformError::file(
                    ErrorKind::StructuralInvariantViolation,
                    "forever cannot be followed by any statements",
                ));
            }
        }
        Ok(Self { nodes })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(node: Node) -> Self {
        Self { nodes: vec![node] }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.nodes.iter().map(Node::to_json).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HatBlock {
    pub opcode: String,
    pub inputs: Vec<(String, Input)>,
    pub fields: Vec<(String, FieldValue)>,
    pub body: Stack,
}

impl HatBlock {
    pub fn new(opcode: impl Into<String>, body: Stack) -> Self {
        Self {
            opcode: opcode.into(),
            inputs: Vec::new(),
            fields: Vec::new(),
            body,
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, input: impl Into<Input>) -> Self {
        self.inputs.push((name.into(), input.into()));
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FieldValue) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, input)| input)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "opcode": self.opcode,
            "inputs": inputs_json(&self.inputs),
            "fields": fields_json(&self.fields),
            "body": self.body.to_json(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcDef {
    pub name: String,
    pub arguments: Vec<String>,
    pub warp: bool,
    pub body: Stack,
}

impl ProcDef {
    pub fn to_json(&self) -> Value {
        json!({
            "opcode": "procedures_definition",
            "name": self.name,
            "arguments": self.arguments,
            "warp": self.warp,
            "body": self.body.to_json(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Hat(HatBlock),
    Procedure(ProcDef),
}

impl Root {
    pub fn body(&self) -> &Stack {
        match self {
            Root::Hat(hat) => &hat.body,
            Root::Procedure(def) => &def.body,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Root::Hat(hat) => hat.to_json(),
            Root::Procedure(def) => def.to_json(),
        }
    }
}

fn inputs_json(inputs: &[(String, Input)]) -> Value {
    let mut map = Map::new();
    for (name, input) in inputs {
        map.insert(name.clone(), input.to_json());
    }
    Value::Object(map)
}

fn fields_json(fields: &[(String, FieldValue)]) -> Value {
    let mut map = Map::new();
    for (name, field) in fields {
        map.insert(name.clone(), field.to_json());
    }
    Value::Object(map)
}
