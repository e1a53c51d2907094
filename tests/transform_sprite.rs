mod common;

use common::*;
use sbtext_blocks_core::ast::{ArithOp, ElifBranch, Statement};
use sbtext_blocks_core::ir::{FieldValue, Input, Node, Root, Variable};
use sbtext_blocks_core::{
    compile_sprite, transform_sprite, transform_sprite_with_progress, BlockFactory, ErrorKind,
    TransformError, TransformOptions,
};
use serde_json::json;

#[test]
fn procedures_and_scripts_become_roots_in_order() {
    let sprite = sprite(
        &["score"],
        &["items"],
        vec![
            procedure(
                "bump",
                &["amount"],
                vec![
                    Statement::Local {
                        name: tok("step"),
                        value: arith(ArithOp::Mul, arg("amount"), num("2")),
                    },
                    Statement::ChangeBy {
                        name: tok("score"),
                        value: ident("step"),
                    },
                ],
            ),
            on_flag(vec![
                Statement::SetVar {
                    name: tok("score"),
                    value: num("0"),
                },
                call("bump", vec![arith(ArithOp::Add, num("1"), num("2"))]),
            ]),
        ],
    );

    let roots = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap();
    assert_eq!(roots.len(), 2);

    let Root::Procedure(bump) = &roots[0] else {
        panic!("expected a procedure definition");
    };
    assert_eq!(bump.name, "bump");
    assert_eq!(bump.arguments, vec!["amount"]);
    assert!(bump.warp);
    let set_local = bump.body.nodes()[0].as_block().unwrap();
    assert_eq!(
        set_local.field("VARIABLE"),
        Some(&FieldValue::Variable(Variable::local("bump", "step")))
    );
    let change = bump.body.nodes()[1].as_block().unwrap();
    assert_eq!(
        change.input("VALUE"),
        Some(&Input::Variable(Variable::local("bump", "step")))
    );

    let Root::Hat(flag) = &roots[1] else {
        panic!("expected a hat block");
    };
    assert_eq!(flag.opcode, "event_whenflagclicked");
    let Node::Call(call) = &flag.body.nodes()[1] else {
        panic!("expected a procedure call");
    };
    assert_eq!(call.proccode, "bump %s");
    assert_eq!(call.argument("amount"), Some(&Input::literal("3")));
}

#[test]
fn json_view_of_a_script() {
    let sprite = sprite(
        &["x"],
        &[],
        vec![on_flag(vec![Statement::CompoundAssign {
            name: tok("x"),
            op: ArithOp::Mul,
            value: num("2"),
        }])],
    );
    let roots = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap();
    assert_eq!(
        roots[0].to_json(),
        json!({
            "opcode": "event_whenflagclicked",
            "inputs": {},
            "fields": {},
            "body": [{
                "opcode": "data_setvariableto",
                "inputs": {
                    "VALUE": {
                        "opcode": "operator_multiply",
                        "inputs": {"NUM1": {"variable": "x"}, "NUM2": "2"},
                        "fields": {}
                    }
                },
                "fields": {"VARIABLE": {"variable": "x"}}
            }]
        })
    );
}

#[test]
fn elif_chain_with_else_nests_one_if_else_per_branch() {
    let branches = 3;
    let sprite = sprite(
        &["x"],
        &[],
        vec![on_flag(vec![Statement::If {
            condition: ident("x"),
            body: vec![call("say", vec![text("0")])],
            elifs: (1..branches)
                .map(|i| ElifBranch {
                    condition: ident("x"),
                    body: vec![call("say", vec![text(&i.to_string())])],
                })
                .collect(),
            else_body: Some(vec![call("say", vec![text("else")])]),
        }])],
    );
    let roots = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap();

    let mut depth = 0;
    let mut current = roots[0].body().nodes()[0].as_block().unwrap();
    loop {
        assert_eq!(current.opcode, "control_if_else");
        depth += 1;
        let otherwise = current.input("SUBSTACK2").and_then(Input::as_stack).unwrap();
        match otherwise.nodes()[0].as_block() {
            Some(next) if next.opcode.starts_with("control_if") => current = next,
            Some(last) => {
                assert_eq!(last.opcode, "looks_say");
                assert_eq!(last.input("MESSAGE"), Some(&Input::literal("else")));
                break;
            }
            None => panic!("unexpected call in else branch"),
        }
    }
    assert_eq!(depth, branches);
}

#[test]
fn forever_in_the_middle_of_a_script_fails_the_run() {
    let sprite = sprite(
        &[],
        &[],
        vec![on_flag(vec![
            Statement::Forever {
                pos: tok("forever").pos,
                body: vec![call("move", vec![num("1")])],
            },
            call("say", vec![text("done")]),
        ])],
    );
    let err = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralInvariantViolation);
    assert!(matches!(err, TransformError::File(_)));
}

#[test]
fn first_error_aborts_the_run() {
    let sprite = sprite(
        &["score"],
        &[],
        vec![
            on_flag(vec![Statement::SetVar {
                name: tok("scor"),
                value: num("1"),
            }]),
            on_flag(vec![call("nonsense", Vec::new())]),
        ],
    );
    let mut seen = Vec::new();
    let mut record = |step: usize, total: usize, label: &str| seen.push((step, total, label.to_string()));
    let err = transform_sprite_with_progress(
        &sprite,
        &BlockFactory::standard(),
        TransformOptions::default(),
        Some(&mut record),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedIdentifier);
    assert_eq!(err.suggestion(), Some("score"));
    assert!(seen.is_empty());
}

#[test]
fn progress_reports_each_declaration() {
    let sprite = sprite(
        &[],
        &[],
        vec![procedure("noop", &[], Vec::new()), on_flag(Vec::new())],
    );
    let mut seen = Vec::new();
    let mut record = |step: usize, total: usize, label: &str| seen.push((step, total, label.to_string()));
    transform_sprite_with_progress(
        &sprite,
        &BlockFactory::standard(),
        TransformOptions::default(),
        Some(&mut record),
    )
    .unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (1, 2, "Transformed function `noop`".to_string()));
    assert_eq!(seen[1].0, 2);
}

#[test]
fn argument_outside_a_procedure_is_an_error() {
    let sprite = sprite(&[], &[], vec![on_flag(vec![call("say", vec![arg("n")])])]);
    let err = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentOutsideFunction);
}

#[test]
fn two_argument_procedure_arity_is_exact() {
    let with_args = |count: usize| {
        sprite(
            &[],
            &[],
            vec![
                procedure("pair", &["left", "right"], Vec::new()),
                on_flag(vec![call("pair", (0..count).map(|i| num(&i.to_string())).collect())]),
            ],
        )
    };
    let factory = BlockFactory::standard();

    let err = transform_sprite(&with_args(1), &factory, TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    assert_eq!(err.help(), Some("Missing right"));

    let err = transform_sprite(&with_args(3), &factory, TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    assert_eq!(err.help(), Some("Expected 2 arguments"));

    assert!(transform_sprite(&with_args(2), &factory, TransformOptions::default()).is_ok());
}

#[test]
fn list_used_as_a_variable_is_rejected() {
    let sprite = sprite(
        &[],
        &["score"],
        vec![on_flag(vec![Statement::SetVar {
            name: tok("score"),
            value: num("1"),
        }])],
    );
    let err = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongIdentifierKind);
}

#[test]
fn compile_sprite_formats_errors_with_help() {
    let sprite = sprite(&[], &[], vec![on_flag(vec![call("sya", vec![text("hi")])])]);
    let err = compile_sprite(&sprite, &BlockFactory::standard()).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Transform error in sprite 'Player': Undefined statement or function `sya`"));
    assert!(message.contains("(line 1, column 1)"));
    assert!(message.ends_with("help: Did you mean `say`?"));
}

#[test]
fn duplicate_declarations_fail_before_transforming() {
    let sprite = sprite(&["hp"], &["hp"], vec![on_flag(Vec::new())]);
    let err = transform_sprite(&sprite, &BlockFactory::standard(), TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateDefinition);
}
