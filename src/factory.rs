use crate::ir::{Block, FieldValue, Input};
use std::collections::BTreeMap;

/// `signature` may pin fields after the opcode: `operator_mathop.OPERATOR=sqrt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub signature: String,
    pub opcode: String,
    pub fields: Vec<(String, String)>,
    pub arguments: Vec<String>,
}

impl Prototype {
    pub fn new(signature: &str, arguments: &[&str]) -> Self {
        let mut parts = signature.split('.');
        let opcode = parts.next().unwrap_or_default().to_string();
        let fields = parts
            .filter_map(|part| part.split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self {
            signature: signature.to_string(),
            opcode,
            fields,
            arguments: arguments.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Binds `actuals` to the formal names in order. Arity is checked by the caller.
    pub fn instantiate(&self, actuals: Vec<Input>, comment: Option<String>) -> Block {
        let mut block = Block::new(self.opcode.clone()).with_comment(comment);
        for (name, value) in &self.fields {
            block = block.with_field(name.clone(), FieldValue::Text(value.clone()));
        }
        for (name, input) in self.arguments.iter().zip(actuals) {
            block = block.with_input(name.clone(), input);
        }
        block
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockFactory {
    statements: BTreeMap<String, Prototype>,
    reporters: BTreeMap<String, Prototype>,
}

impl BlockFactory {
    pub fn new<S, R>(statements: S, reporters: R) -> Self
    where
        S: IntoIterator<Item = (String, Prototype)>,
        R: IntoIterator<Item = (String, Prototype)>,
    {
        Self {
            statements: statements.into_iter().collect(),
            reporters: reporters.into_iter().collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new(
            table(STANDARD_STATEMENTS),
            table(STANDARD_REPORTERS),
        )
    }

    pub fn statement(&self, name: &str) -> Option<&Prototype> {
        self.statements.get(name)
    }

    pub fn reporter(&self, name: &str) -> Option<&Prototype> {
        self.reporters.get(name)
    }

    pub fn statement_names(&self) -> impl Iterator<Item = &str> {
        self.statements.keys().map(String::as_str)
    }

    pub fn reporter_names(&self) -> impl Iterator<Item = &str> {
        self.reporters.keys().map(String::as_str)
    }
}

fn table(entries: &[(&str, &str, &[&str])]) -> Vec<(String, Prototype)> {
    entries
        .iter()
        .map(|(name, signature, arguments)| (name.to_string(), Prototype::new(signature, arguments)))
        .collect()
}

pub const SQRT_SIGNATURE: &str = "operator_mathop.OPERATOR=sqrt";

const STANDARD_STATEMENTS: &[(&str, &str, &[&str])] = &[
    ("move", "motion_movesteps", &["STEPS"]),
    ("turn_right", "motion_turnright", &["DEGREES"]),
    ("turn_left", "motion_turnleft", &["DEGREES"]),
    ("goto", "motion_gotoxy", &["X", "Y"]),
    ("glide", "motion_glidesecstoxy", &["SECS", "X", "Y"]),
    ("point_in_direction", "motion_pointindirection", &["DIRECTION"]),
    ("change_x", "motion_changexby", &["DX"]),
    ("set_x", "motion_setx", &["X"]),
    ("change_y", "motion_changeyby", &["DY"]),
    ("set_y", "motion_sety", &["Y"]),
    ("if_on_edge_bounce", "motion_ifonedgebounce", &[]),
    ("say", "looks_say", &["MESSAGE"]),
    ("say_for", "looks_sayforsecs", &["MESSAGE", "SECS"]),
    ("think", "looks_think", &["MESSAGE"]),
    ("think_for", "looks_thinkforsecs", &["MESSAGE", "SECS"]),
    ("show", "looks_show", &[]),
    ("hide", "looks_hide", &[]),
    ("next_costume", "looks_nextcostume", &[]),
    ("next_backdrop", "looks_nextbackdrop", &[]),
    ("change_size", "looks_changesizeby", &["CHANGE"]),
    ("set_size", "looks_setsizeto", &["SIZE"]),
    ("clear_graphic_effects", "looks_cleargraphiceffects", &[]),
    ("stop_all_sounds", "sound_stopallsounds", &[]),
    ("set_volume", "sound_setvolumeto", &["VOLUME"]),
    ("change_volume", "sound_changevolumeby", &["VOLUME"]),
    ("broadcast", "event_broadcast", &["BROADCAST_INPUT"]),
    ("broadcast_and_wait", "event_broadcastandwait", &["BROADCAST_INPUT"]),
    ("wait", "control_wait", &["DURATION"]),
    ("stop_all", "control_stop.STOP_OPTION=all", &[]),
    ("stop_this_script", "control_stop.STOP_OPTION=this script", &[]),
    ("delete_this_clone", "control_delete_this_clone", &[]),
    ("ask", "sensing_askandwait", &["QUESTION"]),
    ("reset_timer", "sensing_resettimer", &[]),
    ("erase_all", "pen_clear", &[]),
    ("stamp", "pen_stamp", &[]),
    ("pen_down", "pen_penDown", &[]),
    ("pen_up", "pen_penUp", &[]),
    ("change_pen_size", "pen_changePenSizeBy", &["SIZE"]),
    ("set_pen_size", "pen_setPenSizeTo", &["SIZE"]),
];

const STANDARD_REPORTERS: &[(&str, &str, &[&str])] = &[
    ("add", "operator_add", &["NUM1", "NUM2"]),
    ("sub", "operator_subtract", &["NUM1", "NUM2"]),
    ("mul", "operator_multiply", &["NUM1", "NUM2"]),
    ("div", "operator_divide", &["NUM1", "NUM2"]),
    ("mod", "operator_mod", &["NUM1", "NUM2"]),
    ("join", "operator_join", &["STRING1", "STRING2"]),
    ("eq", "operator_equals", &["OPERAND1", "OPERAND2"]),
    ("gt", "operator_gt", &["OPERAND1", "OPERAND2"]),
    ("lt", "operator_lt", &["OPERAND1", "OPERAND2"]),
    ("AND", "operator_and", &["OPERAND1", "OPERAND2"]),
    ("OR", "operator_or", &["OPERAND1", "OPERAND2"]),
    ("NOT", "operator_not", &["OPERAND"]),
    ("random", "operator_random", &["FROM", "TO"]),
    ("letter", "operator_letter_of", &["LETTER", "STRING"]),
    ("length", "operator_length", &["STRING"]),
    ("contains", "operator_contains", &["STRING1", "STRING2"]),
    ("round", "operator_round", &["NUM"]),
    ("abs", "operator_mathop.OPERATOR=abs", &["NUM"]),
    ("floor", "operator_mathop.OPERATOR=floor", &["NUM"]),
    ("ceiling", "operator_mathop.OPERATOR=ceiling", &["NUM"]),
    ("sqrt", SQRT_SIGNATURE, &["NUM"]),
    ("sin", "operator_mathop.OPERATOR=sin", &["NUM"]),
    ("cos", "operator_mathop.OPERATOR=cos", &["NUM"]),
    ("tan", "operator_mathop.OPERATOR=tan", &["NUM"]),
    ("ln", "operator_mathop.OPERATOR=ln", &["NUM"]),
    ("log", "operator_mathop.OPERATOR=log", &["NUM"]),
    ("x_position", "motion_xposition", &[]),
    ("y_position", "motion_yposition", &[]),
    ("direction", "motion_direction", &[]),
    ("size", "looks_size", &[]),
    ("volume", "sound_volume", &[]),
    ("timer", "sensing_timer", &[]),
    ("answer", "sensing_answer", &[]),
    ("mouse_x", "sensing_mousex", &[]),
    ("mouse_y", "sensing_mousey", &[]),
    ("mouse_down", "sensing_mousedown", &[]),
    ("loudness", "sensing_loudness", &[]),
    ("key_pressed", "sensing_keypressed", &["KEY_OPTION"]),
    ("touching_color", "sensing_touchingcolor", &["COLOR"]),
    ("color_is_touching_color", "sensing_coloristouchingcolor", &["COLOR", "COLOR2"]),
    ("days_since_2000", "sensing_dayssince2000", &[]),
    ("username", "sensing_username", &[]),
];
