#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub pos: Position,
}

impl Token {
    pub fn new(value: impl Into<String>, pos: Position) -> Self {
        Self {
            value: value.into(),
            pos,
        }
    }

    pub fn at(value: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(value, Position::new(line, column))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    Float,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Join,
}

impl ArithOp {
    pub fn reporter_key(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
            ArithOp::Mod => "mod",
            ArithOp::Join => "join",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Arith(ArithOp),
    Eq,
    Gt,
    Lt,
    And,
    Or,
}

impl BinaryOp {
    pub fn reporter_key(self) -> &'static str {
        match self {
            BinaryOp::Arith(op) => op.reporter_key(),
            BinaryOp::Eq => "eq",
            BinaryOp::Gt => "gt",
            BinaryOp::Lt => "lt",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal {
        kind: LiteralKind,
        token: Token,
    },
    /// `$name`, a reference to the enclosing procedure's parameter.
    Argument {
        token: Token,
    },
    Identifier {
        token: Token,
    },
    Reporter {
        opcode: Token,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        token: Token,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Negate {
        token: Token,
        operand: Box<Expr>,
    },
    Not {
        token: Token,
        operand: Box<Expr>,
    },
    ListItem {
        list: Token,
        index: Box<Expr>,
    },
    ListIndexOf {
        list: Token,
        item: Box<Expr>,
    },
    ListContains {
        list: Token,
        item: Box<Expr>,
    },
    ListLength {
        list: Token,
    },
}

impl Expr {
    pub fn pos(&self) -> Position {
        match self {
            Expr::Literal { token, .. }
            | Expr::Argument { token }
            | Expr::Identifier { token }
            | Expr::Binary { token, .. }
            | Expr::Negate { token, .. }
            | Expr::Not { token, .. } => token.pos,
            Expr::Reporter { opcode, .. } => opcode.pos,
            Expr::ListItem { list, .. }
            | Expr::ListIndexOf { list, .. }
            | Expr::ListContains { list, .. }
            | Expr::ListLength { list } => list.pos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElifBranch {
    pub condition: Expr,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Invoke {
        opcode: Token,
        args: Vec<Expr>,
        comment: Option<Token>,
    },
    If {
        condition: Expr,
        body: Vec<Statement>,
        elifs: Vec<ElifBranch>,
        else_body: Option<Vec<Statement>>,
    },
    RepeatUntil {
        condition: Expr,
        body: Vec<Statement>,
    },
    Repeat {
        times: Expr,
        body: Vec<Statement>,
    },
    Forever {
        pos: Position,
        body: Vec<Statement>,
    },
    Local {
        name: Token,
        value: Expr,
    },
    SetVar {
        name: Token,
        value: Expr,
    },
    /// `x *= v`, `x /= v`, `x %= v`, `x ..= v` and friends.
    CompoundAssign {
        name: Token,
        op: ArithOp,
        value: Expr,
    },
    ChangeBy {
        name: Token,
        value: Expr,
    },
    SubtractBy {
        name: Token,
        value: Expr,
    },
    ListClear {
        list: Token,
    },
    ListAdd {
        list: Token,
        item: Expr,
    },
    ListDelete {
        list: Token,
        index: Expr,
    },
    ListInsert {
        list: Token,
        index: Expr,
        item: Expr,
    },
    ListReplace {
        list: Token,
        index: Expr,
        item: Expr,
    },
    /// `list[i] += v` and friends.
    ListCompoundReplace {
        list: Token,
        index: Expr,
        op: ArithOp,
        value: Expr,
    },
    ListShow {
        list: Token,
    },
    ListHide {
        list: Token,
    },
    Nop {
        pos: Position,
    },
}

impl Statement {
    pub fn pos(&self) -> Position {
        match self {
            Statement::Invoke { opcode, .. } => opcode.pos,
            Statement::If { condition, .. } | Statement::RepeatUntil { condition, .. } => {
                condition.pos()
            }
            Statement::Repeat { times, .. } => times.pos(),
            Statement::Forever { pos, .. } | Statement::Nop { pos } => *pos,
            Statement::Local { name, .. }
            | Statement::SetVar { name, .. }
            | Statement::CompoundAssign { name, .. }
            | Statement::ChangeBy { name, .. }
            | Statement::SubtractBy { name, .. } => name.pos,
            Statement::ListClear { list }
            | Statement::ListAdd { list, .. }
            | Statement::ListDelete { list, .. }
            | Statement::ListInsert { list, .. }
            | Statement::ListReplace { list, .. }
            | Statement::ListCompoundReplace { list, .. }
            | Statement::ListShow { list }
            | Statement::ListHide { list } => list.pos,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EventType {
    WhenIReceive(Token),
    WhenKeyPressed(Token),
    WhenBackdropSwitchesTo(Token),
    WhenLoudnessExceeds(Expr),
    WhenTimerExceeds(Expr),
    WhenFlagClicked,
    WhenThisSpriteClicked,
    WhenICloneStart,
}

#[derive(Debug, Clone)]
pub struct EventScript {
    pub pos: Position,
    pub event_type: EventType,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: Token,
    pub params: Vec<Token>,
    pub run_without_screen_refresh: bool,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Procedure(Procedure),
    Event(EventScript),
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub pos: Position,
    pub name: String,
    pub variables: Vec<Token>,
    pub lists: Vec<Token>,
    pub declarations: Vec<Declaration>,
}
