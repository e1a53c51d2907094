use crate::ast::{BinaryOp, Declaration, Expr, Procedure, Statement, Token};
use crate::builders;
use crate::control;
use crate::error::{ErrorKind, TransformError, TransformResult};
use crate::factory::{BlockFactory, Prototype};
use crate::fold::{fold_arith, negate_literal, normalize_literal, unquote};
use crate::ir::{Input, Node, ProcDef, Root, Stack};
use crate::registry::{DefinitionRegistry, Function};
use crate::suggest::DEFAULT_CUTOFF;

#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    pub fold_constants: bool,
    pub suggestion_cutoff: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            fold_constants: true,
            suggestion_cutoff: DEFAULT_CUTOFF,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    pub(crate) registry: &'a DefinitionRegistry,
    pub(crate) factory: &'a BlockFactory,
    pub(crate) function: Option<&'a Function>,
    pub(crate) options: TransformOptions,
}

impl<'a> Transformer<'a> {
    pub fn new(
        registry: &'a DefinitionRegistry,
        factory: &'a BlockFactory,
        options: TransformOptions,
    ) -> Self {
        Self {
            registry,
            factory,
            function: None,
            options,
        }
    }

    pub fn in_procedure(&self, function: &'a Function) -> Self {
        Self {
            function: Some(function),
            ..*self
        }
    }

    pub fn outside_procedure(&self) -> Self {
        Self {
            function: None,
            ..*self
        }
    }

    pub fn transform_declaration(&self, declaration: &Declaration) -> TransformResult<Root> {
        let outer = self.outside_procedure();
        match declaration {
            Declaration::Procedure(procedure) => outer.transform_procedure(procedure).map(Root::Procedure),
            Declaration::Event(script) => outer.transform_event(script).map(Root::Hat),
        }
    }

    pub fn transform_procedure(&self, procedure: &Procedure) -> TransformResult<ProcDef> {
        let function = self
            .registry
            .lookup_procedure(&procedure.name.value)
            .ok_or_else(|| {
                TransformError::token(
                    ErrorKind::UndefinedStatementOrProcedure,
                    format!("Function `{}` was not registered", procedure.name.value),
                    &procedure.name,
                )
            })?;
        let body = self.in_procedure(function).transform_stack(&procedure.body)?;
        Ok(ProcDef {
            name: function.name.clone(),
            arguments: function.arguments.clone(),
            warp: function.warp,
            body,
        })
    }

    pub fn transform_stack(&self, statements: &[Statement]) -> TransformResult<Stack> {
        let nodes = statements
            .iter()
            .map(|statement| self.transform_statement(statement))
            .collect::<TransformResult<Vec<_>>>()?;
        Stack::new(nodes)
    }

    pub fn transform_statement(&self, statement: &Statement) -> TransformResult<Node> {
        let block = match statement {
            Statement::Invoke {
                opcode,
                args,
                comment,
            } => {
                let args = self.transform_args(args)?;
                let comment = comment.as_ref().map(|token| unquote(&token.value));
                return self.invocation(opcode, args, comment);
            }
            Statement::If {
                condition,
                body,
                elifs,
                else_body,
            } => {
                let head = (self.transform_expr(condition)?, self.transform_stack(body)?);
                let elifs = elifs
                    .iter()
                    .map(|branch| {
                        Ok((
                            self.transform_expr(&branch.condition)?,
                            self.transform_stack(&branch.body)?,
                        ))
                    })
                    .collect::<TransformResult<Vec<_>>>()?;
                let else_body = else_body
                    .as_deref()
                    .map(|body| self.transform_stack(body))
                    .transpose()?;
                control::if_chain(head, elifs, else_body)
            }
            Statement::RepeatUntil { condition, body } => {
                control::repeat_until(self.transform_expr(condition)?, self.transform_stack(body)?)
            }
            Statement::Repeat { times, body } => {
                control::repeat(self.transform_expr(times)?, self.transform_stack(body)?)
            }
            Statement::Forever { body, .. } => control::forever(self.transform_stack(body)?),
            Statement::Local { name, value } => {
                let value = self.transform_expr(value)?;
                self.local_assign(name, value)?
            }
            Statement::SetVar { name, value } => {
                let value = self.transform_expr(value)?;
                self.set_variable(name, value)?
            }
            Statement::CompoundAssign { name, op, value } => {
                let value = self.transform_expr(value)?;
                self.compound_assign(name, *op, value)?
            }
            Statement::ChangeBy { name, value } => {
                let value = self.transform_expr(value)?;
                self.change_by(name, value)?
            }
            Statement::SubtractBy { name, value } => {
                let value = self.transform_expr(value)?;
                self.subtract_by(name, value)?
            }
            Statement::ListClear { list } => builders::delete_all_of_list(self.list(list)?),
            Statement::ListAdd { list, item } => {
                let item = self.transform_expr(item)?;
                builders::add_to_list(self.list(list)?, item)
            }
            Statement::ListDelete { list, index } => {
                let index = self.transform_expr(index)?;
                builders::delete_of_list(self.list(list)?, index)
            }
            Statement::ListInsert { list, index, item } => {
                let index = self.transform_expr(index)?;
                let item = self.transform_expr(item)?;
                builders::insert_at_list(self.list(list)?, index, item)
            }
            Statement::ListReplace { list, index, item } => {
                let index = self.transform_expr(index)?;
                let item = self.transform_expr(item)?;
                builders::replace_item_of_list(self.list(list)?, index, item)
            }
            Statement::ListCompoundReplace {
                list,
                index,
                op,
                value,
            } => {
                let index = self.transform_expr(index)?;
                let value = self.transform_expr(value)?;
                self.list_compound_replace(list, index, *op, value)?
            }
            Statement::ListShow { list } => builders::show_list(self.list(list)?),
            Statement::ListHide { list } => builders::hide_list(self.list(list)?),
            Statement::Nop { .. } => control::nop(),
        };
        Ok(Node::Block(block))
    }

    pub fn transform_expr(&self, expr: &Expr) -> TransformResult<Input> {
        match expr {
            Expr::Literal { kind, token } => Ok(Input::Literal(normalize_literal(*kind, &token.value))),
            Expr::Argument { token } => self.argument(token).map(Input::Argument),
            Expr::Identifier { token } => self.identifier(token),
            Expr::Reporter { opcode, args } => {
                let args = self.transform_args(args)?;
                self.reporter(opcode, args)
            }
            Expr::Binary {
                op,
                token,
                left,
                right,
            } => {
                let lhs = self.transform_expr(left)?;
                let rhs = self.transform_expr(right)?;
                self.operator(*op, token, lhs, rhs)
            }
            Expr::Negate { token, operand } => {
                let operand = self.transform_expr(operand)?;
                self.negate(token, operand)
            }
            Expr::Not { token, operand } => {
                let operand = self.transform_expr(operand)?;
                let prototype = self.operator_prototype("NOT", token)?;
                Ok(prototype.instantiate(vec![operand], None).into())
            }
            Expr::ListItem { list, index } => {
                let index = self.transform_expr(index)?;
                Ok(builders::item_of_list(self.list(list)?, index).into())
            }
            Expr::ListIndexOf { list, item } => {
                let item = self.transform_expr(item)?;
                Ok(builders::item_num_of_list(self.list(list)?, item).into())
            }
            Expr::ListContains { list, item } => {
                let item = self.transform_expr(item)?;
                Ok(builders::list_contains_item(self.list(list)?, item).into())
            }
            Expr::ListLength { list } => Ok(builders::length_of_list(self.list(list)?).into()),
        }
    }

    fn transform_args(&self, args: &[Expr]) -> TransformResult<Vec<Input>> {
        args.iter().map(|arg| self.transform_expr(arg)).collect()
    }

    pub fn operator(&self, op: BinaryOp, token: &Token, lhs: Input, rhs: Input) -> TransformResult<Input> {
        if let (BinaryOp::Arith(arith), true) = (op, self.options.fold_constants) {
            if let (Some(a), Some(b)) = (lhs.as_literal(), rhs.as_literal()) {
                if let Some(folded) = fold_arith(arith, a, b) {
                    return Ok(Input::Literal(folded));
                }
            }
        }
        let prototype = self.operator_prototype(op.reporter_key(), token)?;
        Ok(prototype.instantiate(vec![lhs, rhs], None).into())
    }

    /// Unary minus: toggles the sign of a literal, otherwise `0 - operand`.
    pub fn negate(&self, token: &Token, operand: Input) -> TransformResult<Input> {
        if self.options.fold_constants {
            if let Some(text) = operand.as_literal() {
                return Ok(Input::Literal(negate_literal(text)));
            }
        }
        let prototype = self.operator_prototype("sub", token)?;
        Ok(prototype
            .instantiate(vec![Input::literal("0"), operand], None)
            .into())
    }

    pub(crate) fn operator_prototype(&self, key: &str, token: &Token) -> TransformResult<&'a Prototype> {
        self.factory.reporter(key).ok_or_else(|| {
            TransformError::token(
                ErrorKind::UndefinedReporter,
                format!("Undefined reporter `{}`", key),
                token,
            )
        })
    }
}
