use crate::ir::{Block, FieldValue, Input};

pub const AUTO_GENERATED_COMMENT: &str = "auto-generated";

const BOOLEAN_OPCODES: &[&str] = &[
    "operator_equals",
    "operator_lt",
    "operator_gt",
    "operator_and",
    "operator_or",
    "operator_contains",
    "sensing_touchingcolor",
    "sensing_coloristouchingcolor",
    "sensing_keypressed",
    "data_listcontainsitem",
];

pub fn is_boolean_opcode(opcode: &str) -> bool {
    BOOLEAN_OPCODES.contains(&opcode)
}

/// Lists test as "not empty", other non-boolean values as "not equal to zero".
pub fn coerce_condition(input: Input) -> Block {
    match input {
        Input::Block(block) if is_boolean_opcode(&block.opcode) => *block,
        Input::List(list) => not(
            Block::new("operator_equals")
                .with_input("OPERAND1", "0")
                .with_input(
                    "OPERAND2",
                    Block::new("data_lengthoflist").with_field("LIST", FieldValue::List(list)),
                ),
        ),
        value => not(
            Block::new("operator_equals")
                .with_input("OPERAND1", "0")
                .with_input("OPERAND2", value)
                .with_comment(Some(AUTO_GENERATED_COMMENT.to_string())),
        ),
    }
}

fn not(operand: Block) -> Block {
    Block::new("operator_not").with_input("OPERAND", operand)
}
