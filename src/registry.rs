use crate::ast::{Declaration, Procedure, Sprite, Statement, Token};
use crate::error::{ErrorKind, TransformError, TransformResult};
use crate::ir::{List, Variable};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub token: Token,
    pub arguments: Vec<String>,
    pub locals: Vec<String>,
    pub warp: bool,
    /// Call signature shared by the definition and every call site.
    pub proccode: String,
}

impl Function {
    pub fn has_local(&self, name: &str) -> bool {
        self.locals.iter().any(|local| local == name)
    }
}

pub fn proccode(name: &str, arity: usize) -> String {
    let mut out = name.to_string();
    for _ in 0..arity {
        out.push_str(" %s");
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    variables: BTreeMap<String, Variable>,
    lists: BTreeMap<String, List>,
    functions: BTreeMap<String, Function>,
    locals: BTreeMap<String, Variable>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_variable(&mut self, token: &Token) -> TransformResult<()> {
        self.ensure_unused_data_name(token)?;
        self.variables
            .insert(token.value.clone(), Variable::sprite(token.value.clone()));
        Ok(())
    }

    pub fn declare_list(&mut self, token: &Token) -> TransformResult<()> {
        self.ensure_unused_data_name(token)?;
        self.lists
            .insert(token.value.clone(), List::new(token.value.clone()));
        Ok(())
    }

    pub fn declare_function(
        &mut self,
        name: &Token,
        params: &[Token],
        locals: &[Token],
        warp: bool,
    ) -> TransformResult<&Function> {
        if self.functions.contains_key(&name.value) {
            return Err(TransformError::token(
                ErrorKind::DuplicateDefinition,
                format!("Function `{}` is already defined", name.value),
                name,
            ));
        }
        let mut seen = HashSet::new();
        for param in params {
            if !seen.insert(param.value.as_str()) {
                return Err(TransformError::token(
                    ErrorKind::DuplicateDefinition,
                    format!(
                        "Duplicate argument `{}` in function `{}`",
                        param.value, name.value
                    ),
                    param,
                ));
            }
        }
        let mut local_names: Vec<String> = Vec::new();
        for local in locals {
            if local_names.contains(&local.value) {
                continue;
            }
            let variable = Variable::local(&name.value, &local.value);
            self.locals.insert(variable.name.clone(), variable);
            local_names.push(local.value.clone());
        }
        let function = Function {
            name: name.value.clone(),
            token: name.clone(),
            arguments: params.iter().map(|p| p.value.clone()).collect(),
            locals: local_names,
            warp,
            proccode: proccode(&name.value, params.len()),
        };
        Ok(self
            .functions
            .entry(name.value.clone())
            .or_insert(function))
    }

    pub fn lookup_procedure(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn lookup_list(&self, name: &str) -> Option<&List> {
        self.lists.get(name)
    }

    pub fn lookup_local(&self, function: &Function, name: &str) -> Option<&Variable> {
        if !function.has_local(name) {
            return None;
        }
        self.locals.get(&format!("{}.{}", function.name, name))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn list_names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn procedure_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    fn ensure_unused_data_name(&self, token: &Token) -> TransformResult<()> {
        let existing = if self.variables.contains_key(&token.value) {
            Some("variable")
        } else if self.lists.contains_key(&token.value) {
            Some("list")
        } else {
            None
        };
        match existing {
            Some(kind) => Err(TransformError::token(
                ErrorKind::DuplicateDefinition,
                format!("`{}` is already declared as a {}", token.value, kind),
                token,
            )),
            None => Ok(()),
        }
    }
}

pub fn collect(sprite: &Sprite) -> TransformResult<DefinitionRegistry> {
    let mut registry = DefinitionRegistry::new();
    for variable in &sprite.variables {
        registry.declare_variable(variable)?;
    }
    for list in &sprite.lists {
        registry.declare_list(list)?;
    }
    for declaration in &sprite.declarations {
        if let Declaration::Procedure(procedure) = declaration {
            declare_procedure(&mut registry, procedure)?;
        }
    }
    Ok(registry)
}

fn declare_procedure(registry: &mut DefinitionRegistry, procedure: &Procedure) -> TransformResult<()> {
    let mut locals = Vec::new();
    collect_locals(&procedure.body, &mut locals);
    registry.declare_function(
        &procedure.name,
        &procedure.params,
        &locals,
        procedure.run_without_screen_refresh,
    )?;
    Ok(())
}

fn collect_locals(statements: &[Statement], out: &mut Vec<Token>) {
    for statement in statements {
        match statement {
            Statement::Local { name, .. } => out.push(name.clone()),
            Statement::If {
                body,
                elifs,
                else_body,
                ..
            } => {
                collect_locals(body, out);
                for branch in elifs {
                    collect_locals(&branch.body, out);
                }
                if let Some(else_body) = else_body {
                    collect_locals(else_body, out);
                }
            }
            Statement::RepeatUntil { body, .. }
            | Statement::Repeat { body, .. }
            | Statement::Forever { body, .. } => collect_locals(body, out),
            _ => {}
        }
    }
}
