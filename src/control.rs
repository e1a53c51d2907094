use crate::condition::coerce_condition;
use crate::ir::{Block, Input, Node, Stack, FOREVER_OPCODE};

pub fn if_chain(head: (Input, Stack), elifs: Vec<(Input, Stack)>, else_body: Option<Stack>) -> Block {
    let mut otherwise = else_body;
    for (condition, body) in elifs.into_iter().rev() {
        let nested = conditional(condition, body, otherwise.take());
        otherwise = Some(Stack::single(Node::Block(nested)));
    }
    let (condition, body) = head;
    conditional(condition, body, otherwise)
}

fn conditional(condition: Input, body: Stack, otherwise: Option<Stack>) -> Block {
    let opcode = if otherwise.is_some() {
        "control_if_else"
    } else {
        "control_if"
    };
    let block = Block::new(opcode)
        .with_input("CONDITION", coerce_condition(condition))
        .with_input("SUBSTACK", body);
    match otherwise {
        Some(otherwise) => block.with_input("SUBSTACK2", otherwise),
        None => block,
    }
}

pub fn repeat_until(condition: Input, body: Stack) -> Block {
    Block::new("control_repeat_until")
        .with_input("CONDITION", coerce_condition(condition))
        .with_input("SUBSTACK", body)
}

pub fn repeat(times: Input, body: Stack) -> Block {
    Block::new("control_repeat")
        .with_input("TIMES", times)
        .with_input("SUBSTACK", body)
}

pub fn forever(body: Stack) -> Block {
    Block::new(FOREVER_OPCODE).with_input("SUBSTACK", body)
}

pub fn nop() -> Block {
    Block::new("control_wait").with_input("DURATION", "0")
}
