use crate::ast::{ArithOp, BinaryOp, EventScript, EventType, Token};
use crate::error::{ErrorKind, TransformError, TransformResult};
use crate::fold::unquote;
use crate::ir::{Block, FieldValue, HatBlock, Input, List, Stack, Variable};
use crate::transform::Transformer;

impl<'a> Transformer<'a> {
    pub fn transform_event(&self, script: &EventScript) -> TransformResult<HatBlock> {
        let mut hat = match &script.event_type {
            EventType::WhenIReceive(signal) => HatBlock::new("event_whenbroadcastreceived", Stack::empty())
                .with_field("BROADCAST_OPTION", named(signal)),
            EventType::WhenKeyPressed(key) => HatBlock::new("event_whenkeypressed", Stack::empty())
                .with_field("KEY_OPTION", named(key)),
            EventType::WhenBackdropSwitchesTo(backdrop) => {
                HatBlock::new("event_whenbackdropswitchesto", Stack::empty())
                    .with_field("BACKDROP_OPTION", named(backdrop))
            }
            EventType::WhenLoudnessExceeds(value) => greater_than(self.transform_expr(value)?, "LOUDNESS"),
            EventType::WhenTimerExceeds(value) => greater_than(self.transform_expr(value)?, "TIMER"),
            EventType::WhenFlagClicked => HatBlock::new("event_whenflagclicked", Stack::empty()),
            EventType::WhenThisSpriteClicked => {
                HatBlock::new("event_whenthisspriteclicked", Stack::empty())
            }
            EventType::WhenICloneStart => HatBlock::new("control_start_as_clone", Stack::empty()),
        };
        // The trigger value is resolved before the body.
        hat.body = self.transform_stack(&script.body)?;
        Ok(hat)
    }

    pub(crate) fn set_variable(&self, name: &Token, value: Input) -> TransformResult<Block> {
        Ok(set_variable_to(self.variable(name)?, value))
    }

    pub(crate) fn local_assign(&self, name: &Token, value: Input) -> TransformResult<Block> {
        if self.function.is_none() {
            return Err(TransformError::token(
                ErrorKind::LocalOutsideFunction,
                "local variables cannot be used outside of functions",
                name,
            )
            .with_help("switch to a non-local variable"));
        }
        self.set_variable(name, value)
    }

    /// `x op= value` as one set block over one reporter reading `x`.
    pub(crate) fn compound_assign(&self, name: &Token, op: ArithOp, value: Input) -> TransformResult<Block> {
        let variable = self.variable(name)?;
        let updated = self.operator(
            BinaryOp::Arith(op),
            name,
            Input::Variable(variable.clone()),
            value,
        )?;
        Ok(set_variable_to(variable, updated))
    }

    pub(crate) fn change_by(&self, name: &Token, value: Input) -> TransformResult<Block> {
        Ok(change_variable_by(self.variable(name)?, value))
    }

    pub(crate) fn subtract_by(&self, name: &Token, value: Input) -> TransformResult<Block> {
        let variable = self.variable(name)?;
        let negated = self.negate(name, value)?;
        Ok(change_variable_by(variable, negated))
    }

    /// `list[index] op= value` as one replace block whose item reads the old entry.
    pub(crate) fn list_compound_replace(
        &self,
        name: &Token,
        index: Input,
        op: ArithOp,
        value: Input,
    ) -> TransformResult<Block> {
        let list = self.list(name)?;
        let current = item_of_list(list.clone(), index.clone());
        let item = self.operator(BinaryOp::Arith(op), name, current.into(), value)?;
        Ok(replace_item_of_list(list, index, item))
    }
}

fn named(token: &Token) -> FieldValue {
    FieldValue::Named(unquote(&token.value))
}

fn greater_than(value: Input, menu: &str) -> HatBlock {
    HatBlock::new("event_whengreaterthan", Stack::empty())
        .with_input("VALUE", value)
        .with_field("WHENGREATERTHANMENU", FieldValue::Text(menu.to_string()))
}

pub fn set_variable_to(variable: Variable, value: Input) -> Block {
    Block::new("data_setvariableto")
        .with_input("VALUE", value)
        .with_field("VARIABLE", FieldValue::Variable(variable))
}

pub fn change_variable_by(variable: Variable, value: Input) -> Block {
    Block::new("data_changevariableby")
        .with_input("VALUE", value)
        .with_field("VARIABLE", FieldValue::Variable(variable))
}

pub fn delete_all_of_list(list: List) -> Block {
    Block::new("data_deletealloflist").with_field("LIST", FieldValue::List(list))
}

pub fn add_to_list(list: List, item: Input) -> Block {
    Block::new("data_addtolist")
        .with_input("ITEM", item)
        .with_field("LIST", FieldValue::List(list))
}

pub fn delete_of_list(list: List, index: Input) -> Block {
    Block::new("data_deleteoflist")
        .with_input("INDEX", index)
        .with_field("LIST", FieldValue::List(list))
}

pub fn insert_at_list(list: List, index: Input, item: Input) -> Block {
    Block::new("data_insertatlist")
        .with_input("INDEX", index)
        .with_input("ITEM", item)
        .with_field("LIST", FieldValue::List(list))
}

pub fn replace_item_of_list(list: List, index: Input, item: Input) -> Block {
    Block::new("data_replaceitemoflist")
        .with_input("INDEX", index)
        .with_input("ITEM", item)
        .with_field("LIST", FieldValue::List(list))
}

pub fn show_list(list: List) -> Block {
    Block::new("data_showlist").with_field("LIST", FieldValue::List(list))
}

pub fn hide_list(list: List) -> Block {
    Block::new("data_hidelist").with_field("LIST", FieldValue::List(list))
}

pub fn item_of_list(list: List, index: Input) -> Block {
    Block::new("data_itemoflist")
        .with_input("INDEX", index)
        .with_field("LIST", FieldValue::List(list))
}

pub fn item_num_of_list(list: List, item: Input) -> Block {
    Block::new("data_itemnumoflist")
        .with_input("ITEM", item)
        .with_field("LIST", FieldValue::List(list))
}

pub fn list_contains_item(list: List, item: Input) -> Block {
    Block::new("data_listcontainsitem")
        .with_input("ITEM", item)
        .with_field("LIST", FieldValue::List(list))
}

pub fn length_of_list(list: List) -> Block {
    Block::new("data_lengthoflist").with_field("LIST", FieldValue::List(list))
}
