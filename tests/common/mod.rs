#![allow(dead_code)]

use sbtext_blocks_core::ast::{
    ArithOp, BinaryOp, Declaration, EventScript, EventType, Expr, LiteralKind, Position, Procedure,
    Sprite, Statement, Token,
};

pub fn tok(value: &str) -> Token {
    Token::at(value, 1, 1)
}

pub fn num(value: &str) -> Expr {
    Expr::Literal {
        kind: LiteralKind::Number,
        token: tok(value),
    }
}

pub fn text(value: &str) -> Expr {
    Expr::Literal {
        kind: LiteralKind::String,
        token: tok(&format!("\"{}\"", value)),
    }
}

pub fn ident(name: &str) -> Expr {
    Expr::Identifier { token: tok(name) }
}

pub fn arg(name: &str) -> Expr {
    Expr::Argument {
        token: tok(&format!("${}", name)),
    }
}

pub fn arith(op: ArithOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op: BinaryOp::Arith(op),
        token: tok(op.reporter_key()),
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn call(name: &str, args: Vec<Expr>) -> Statement {
    Statement::Invoke {
        opcode: tok(name),
        args,
        comment: None,
    }
}

pub fn procedure(name: &str, params: &[&str], body: Vec<Statement>) -> Declaration {
    Declaration::Procedure(Procedure {
        name: tok(name),
        params: params.iter().map(|p| tok(p)).collect(),
        run_without_screen_refresh: true,
        body,
    })
}

pub fn on_flag(body: Vec<Statement>) -> Declaration {
    Declaration::Event(EventScript {
        pos: Position::new(1, 1),
        event_type: EventType::WhenFlagClicked,
        body,
    })
}

pub fn sprite(variables: &[&str], lists: &[&str], declarations: Vec<Declaration>) -> Sprite {
    Sprite {
        pos: Position::new(1, 1),
        name: "Player".to_string(),
        variables: variables.iter().map(|v| tok(v)).collect(),
        lists: lists.iter().map(|l| tok(l)).collect(),
        declarations,
    }
}
