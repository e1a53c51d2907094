use crate::ast::Token;
use crate::error::{num_plural, ErrorKind, TransformError, TransformResult};
use crate::factory::SQRT_SIGNATURE;
use crate::fold::fold_sqrt;
use crate::ir::{Argument, Input, List, Node, ProcCall, Variable};
use crate::suggest::closest;
use crate::transform::Transformer;

impl<'a> Transformer<'a> {
    // local, then sprite variable, then sprite list
    pub fn identifier(&self, token: &Token) -> TransformResult<Input> {
        let name = token.value.as_str();
        if let Some(function) = self.function {
            if function.has_local(name) {
                if let Some(variable) = self.registry.lookup_local(function, name) {
                    return Ok(Input::Variable(variable.clone()));
                }
            }
        }
        if let Some(variable) = self.registry.lookup_variable(name) {
            return Ok(Input::Variable(variable.clone()));
        }
        if let Some(list) = self.registry.lookup_list(name) {
            return Ok(Input::List(list.clone()));
        }

        let cutoff = self.options.suggestion_cutoff;
        let (suggestion, help) = if let Some(found) = closest(name, self.registry.variable_names(), cutoff) {
            let help = format!("Did you mean the variable `{}`?", found);
            (Some(found), Some(help))
        } else if let Some(found) = closest(name, self.registry.list_names(), cutoff) {
            let help = format!("Did you mean the list `{}`?", found);
            (Some(found), Some(help))
        } else if let Some(found) = self
            .function
            .and_then(|f| closest(name, f.locals.iter().map(String::as_str), cutoff))
        {
            let help = format!("Did you mean the local variable `{}`?", found);
            (Some(found), Some(help))
        } else {
            (None, None)
        };
        Err(TransformError::token(
            ErrorKind::UndefinedIdentifier,
            format!("Undefined variable or list `{}`", name),
            token,
        )
        .with_suggestion(suggestion, help))
    }

    pub fn variable(&self, token: &Token) -> TransformResult<Variable> {
        match self.identifier(token)? {
            Input::Variable(variable) => Ok(variable),
            _ => Err(TransformError::token(
                ErrorKind::WrongIdentifierKind,
                format!("Identifier `{}` is not a variable", token.value),
                token,
            )),
        }
    }

    pub fn list(&self, token: &Token) -> TransformResult<List> {
        match self.identifier(token)? {
            Input::List(list) => Ok(list),
            _ => Err(TransformError::token(
                ErrorKind::WrongIdentifierKind,
                format!("Identifier `{}` is not a list", token.value),
                token,
            )),
        }
    }

    /// Resolves `$name` against the enclosing procedure's parameters.
    pub fn argument(&self, token: &Token) -> TransformResult<Argument> {
        let Some(function) = self.function else {
            return Err(TransformError::token(
                ErrorKind::ArgumentOutsideFunction,
                "Argument reporter used outside function declaration",
                token,
            ));
        };
        let name = token.value.strip_prefix('$').unwrap_or(&token.value);
        if function.arguments.iter().any(|arg| arg == name) {
            return Ok(Argument {
                name: name.to_string(),
            });
        }
        let suggestion = closest(
            name,
            function.arguments.iter().map(String::as_str),
            self.options.suggestion_cutoff,
        );
        let help = suggestion.as_ref().map(|found| format!("Did you mean `${}`?", found));
        Err(TransformError::token(
            ErrorKind::UndefinedArgument,
            format!("Undefined function argument `${}`", name),
            token,
        )
        .with_suggestion(suggestion, help))
    }

    pub fn invocation(
        &self,
        opcode: &Token,
        args: Vec<Input>,
        comment: Option<String>,
    ) -> TransformResult<Node> {
        if let Some(prototype) = self.factory.statement(&opcode.value) {
            check_arity("statement", opcode, &prototype.arguments, args.len())?;
            return Ok(Node::Block(prototype.instantiate(args, comment)));
        }
        if let Some(function) = self.registry.lookup_procedure(&opcode.value) {
            check_arity("function", opcode, &function.arguments, args.len())?;
            return Ok(Node::Call(ProcCall {
                name: function.name.clone(),
                arguments: function.arguments.iter().cloned().zip(args).collect(),
                warp: function.warp,
                comment,
                proccode: function.proccode.clone(),
            }));
        }
        let suggestion = closest(
            &opcode.value,
            self.factory
                .statement_names()
                .chain(self.registry.procedure_names()),
            self.options.suggestion_cutoff,
        );
        let help = suggestion.as_ref().map(|found| format!("Did you mean `{}`?", found));
        Err(TransformError::token(
            ErrorKind::UndefinedStatementOrProcedure,
            format!("Undefined statement or function `{}`", opcode.value),
            opcode,
        )
        .with_suggestion(suggestion, help))
    }

    pub fn reporter(&self, opcode: &Token, args: Vec<Input>) -> TransformResult<Input> {
        let Some(prototype) = self.factory.reporter(&opcode.value) else {
            let suggestion = closest(
                &opcode.value,
                self.factory.reporter_names(),
                self.options.suggestion_cutoff,
            );
            let help = suggestion.as_ref().map(|found| format!("Did you mean `{}`?", found));
            return Err(TransformError::token(
                ErrorKind::UndefinedReporter,
                format!("Undefined reporter `{}`", opcode.value),
                opcode,
            )
            .with_suggestion(suggestion, help));
        };
        check_arity("reporter", opcode, &prototype.arguments, args.len())?;
        if self.options.fold_constants && prototype.signature == SQRT_SIGNATURE {
            if let Some(root) = args.first().and_then(Input::as_literal).and_then(fold_sqrt) {
                return Ok(Input::Literal(root));
            }
        }
        Ok(prototype.instantiate(args, None).into())
    }
}

fn check_arity(what: &str, opcode: &Token, formals: &[String], actual: usize) -> TransformResult<()> {
    if actual > formals.len() {
        return Err(TransformError::token(
            ErrorKind::ArityMismatch,
            format!("Too many arguments for {}", what),
            opcode,
        )
        .with_help(format!("Expected {}", num_plural(formals.len(), "argument"))));
    }
    if actual < formals.len() {
        return Err(TransformError::token(
            ErrorKind::ArityMismatch,
            format!("Missing arguments for {}", what),
            opcode,
        )
        .with_help(format!("Missing {}", formals[actual..].join(", "))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::BlockFactory;
    use crate::registry::DefinitionRegistry;
    use crate::transform::TransformOptions;

    fn tok(value: &str) -> Token {
        Token::at(value, 4, 9)
    }

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry.declare_variable(&tok("score")).unwrap();
        registry.declare_variable(&tok("speed")).unwrap();
        registry.declare_list(&tok("items")).unwrap();
        registry
            .declare_function(&tok("draw"), &[tok("size"), tok("color")], &[tok("i"), tok("speed")], true)
            .unwrap();
        registry
    }

    #[test]
    fn globals_resolve_outside_procedures() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        assert_eq!(
            t.identifier(&tok("score")).unwrap(),
            Input::Variable(Variable::sprite("score"))
        );
        assert_eq!(t.identifier(&tok("items")).unwrap(), Input::List(List::new("items")));
        assert_eq!(
            t.identifier(&tok("i")).unwrap_err().kind(),
            ErrorKind::UndefinedIdentifier
        );
    }

    #[test]
    fn locals_shadow_globals() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let draw = registry.lookup_procedure("draw").unwrap();
        let t = Transformer::new(&registry, &factory, TransformOptions::default()).in_procedure(draw);
        assert_eq!(
            t.variable(&tok("speed")).unwrap(),
            Variable::local("draw", "speed")
        );
        assert_eq!(t.variable(&tok("score")).unwrap(), Variable::sprite("score"));
    }

    #[test]
    fn unknown_identifier_suggests_a_variable_first() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        let err = t.identifier(&tok("scor")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedIdentifier);
        assert_eq!(err.suggestion(), Some("score"));
        assert_eq!(err.help(), Some("Did you mean the variable `score`?"));

        let err = t.identifier(&tok("item")).unwrap_err();
        assert_eq!(err.suggestion(), Some("items"));
        assert_eq!(err.help(), Some("Did you mean the list `items`?"));
    }

    #[test]
    fn locals_are_suggested_last() {
        let mut registry = DefinitionRegistry::new();
        registry
            .declare_function(&tok("walk"), &[], &[tok("counter")], false)
            .unwrap();
        let factory = BlockFactory::standard();
        let walk = registry.lookup_procedure("walk").unwrap();
        let t = Transformer::new(&registry, &factory, TransformOptions::default()).in_procedure(walk);
        let err = t.identifier(&tok("countr")).unwrap_err();
        assert_eq!(err.suggestion(), Some("counter"));
        assert_eq!(err.help(), Some("Did you mean the local variable `counter`?"));
    }

    #[test]
    fn typed_accessors_check_the_kind() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        assert_eq!(
            t.variable(&tok("items")).unwrap_err().kind(),
            ErrorKind::WrongIdentifierKind
        );
        assert_eq!(
            t.list(&tok("score")).unwrap_err().kind(),
            ErrorKind::WrongIdentifierKind
        );
        assert_eq!(
            t.list(&tok("nothing")).unwrap_err().kind(),
            ErrorKind::UndefinedIdentifier
        );
    }

    #[test]
    fn arguments_need_an_enclosing_procedure() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        assert_eq!(
            t.argument(&tok("$size")).unwrap_err().kind(),
            ErrorKind::ArgumentOutsideFunction
        );

        let draw = registry.lookup_procedure("draw").unwrap();
        let inner = t.in_procedure(draw);
        assert_eq!(inner.argument(&tok("$size")).unwrap().name, "size");
        let err = inner.argument(&tok("$colour")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedArgument);
        assert_eq!(err.suggestion(), Some("color"));
        assert_eq!(err.help(), Some("Did you mean `$color`?"));
    }

    #[test]
    fn statements_win_over_procedures() {
        let mut registry = DefinitionRegistry::new();
        registry.declare_function(&tok("say"), &[], &[], false).unwrap();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        let node = t
            .invocation(&tok("say"), vec![Input::literal("hi")], None)
            .unwrap();
        assert_eq!(node.opcode(), "looks_say");
    }

    #[test]
    fn procedure_calls_bind_arguments_by_position() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        let node = t
            .invocation(
                &tok("draw"),
                vec![Input::literal("10"), Input::literal("red")],
                Some("main".to_string()),
            )
            .unwrap();
        let Node::Call(call) = node else {
            panic!("expected a procedure call");
        };
        assert_eq!(call.proccode, "draw %s %s");
        assert!(call.warp);
        assert_eq!(call.argument("size"), Some(&Input::literal("10")));
        assert_eq!(call.argument("color"), Some(&Input::literal("red")));
        assert_eq!(call.comment.as_deref(), Some("main"));
    }

    #[test]
    fn arity_errors_name_what_is_wrong() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());

        let err = t
            .invocation(&tok("draw"), vec![Input::literal("1")], None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        assert_eq!(err.message(), "Missing arguments for function");
        assert_eq!(err.help(), Some("Missing color"));

        let err = t
            .invocation(
                &tok("draw"),
                vec![Input::literal("1"), Input::literal("2"), Input::literal("3")],
                None,
            )
            .unwrap_err();
        assert_eq!(err.message(), "Too many arguments for function");
        assert_eq!(err.help(), Some("Expected 2 arguments"));

        let err = t
            .invocation(&tok("goto"), Vec::new(), None)
            .unwrap_err();
        assert_eq!(err.message(), "Missing arguments for statement");
        assert_eq!(err.help(), Some("Missing X, Y"));

        let err = t
            .reporter(&tok("round"), vec![Input::literal("1"), Input::literal("2")])
            .unwrap_err();
        assert_eq!(err.message(), "Too many arguments for reporter");
        assert_eq!(err.help(), Some("Expected 1 argument"));
    }

    #[test]
    fn unknown_statement_searches_both_tables() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        let err = t.invocation(&tok("drwa"), Vec::new(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedStatementOrProcedure);
        assert_eq!(err.suggestion(), Some("draw"));

        let err = t.invocation(&tok("sya"), Vec::new(), None).unwrap_err();
        assert_eq!(err.suggestion(), Some("say"));
    }

    #[test]
    fn unknown_reporter_suggests_a_reporter() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        let err = t.reporter(&tok("timr"), Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedReporter);
        assert_eq!(err.suggestion(), Some("timer"));
    }

    #[test]
    fn sqrt_of_a_literal_is_evaluated() {
        let registry = registry();
        let factory = BlockFactory::standard();
        let t = Transformer::new(&registry, &factory, TransformOptions::default());
        assert_eq!(
            t.reporter(&tok("sqrt"), vec![Input::literal("9")]).unwrap(),
            Input::literal("3")
        );
        let block = t
            .reporter(&tok("sqrt"), vec![Input::Variable(Variable::sprite("score"))])
            .unwrap();
        let block = block.as_block().unwrap();
        assert_eq!(block.opcode, "operator_mathop");
        assert_eq!(
            block.field("OPERATOR"),
            Some(&crate::ir::FieldValue::Text("sqrt".to_string()))
        );
        let abs = t.reporter(&tok("abs"), vec![Input::literal("-4")]).unwrap();
        assert!(abs.as_block().is_some());
    }
}
