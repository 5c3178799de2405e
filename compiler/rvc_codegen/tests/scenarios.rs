//! End-to-end lowering of small programs, compared against exact assembly.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use rvc_codegen::{generate_to_string, generate_with, CodegenError, CodegenOptions, ErrorCategory};
use rvc_ir::{release, DataType, Node, NodeKind, VarKind};

/// Join lines, each terminated by a newline.
fn asm(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

const EXIT: [&str; 3] = ["\tli\ta0, 0", "\tli\ta7, 93", "\tecall"];
const PUSH: [&str; 2] = ["\taddi\tsp, sp, -4", "\tsw\tt0, 0(sp)"];
const POP_T1: [&str; 2] = ["\tlw\tt1, 0(sp)", "\taddi\tsp, sp, 4"];

fn bare(program: &Node) -> String {
    generate_to_string(program, &CodegenOptions::bare()).unwrap()
}

fn bare_err(program: &Node) -> CodegenError {
    generate_to_string(program, &CodegenOptions::bare()).unwrap_err()
}

fn global(name: &'static str) -> Node {
    Node::var(name, VarKind::Global, 0)
}

#[test]
fn test_empty_program() {
    let program = Node::program(vec![], vec![], vec![]);
    let mut expected = vec!["\t.text", "", "program:"];
    expected.extend(EXIT);
    assert_eq!(bare(&program), asm(&expected));
}

#[test]
fn test_single_global() {
    let program = Node::program(vec![Node::global("x", DataType::Int)], vec![], vec![]);
    let mut expected = vec!["\t.data", "x:\t.word\t0", "", "\t.text", "", "program:"];
    expected.extend(EXIT);
    assert_eq!(bare(&program), asm(&expected));
}

#[test]
fn test_while_loop_tests_at_bottom() {
    // while (a < b) a = a + 1;
    let program = Node::program(
        vec![
            Node::global("a", DataType::Int),
            Node::global("b", DataType::Int),
        ],
        vec![],
        vec![Node::while_loop(
            Node::relational('<', global("a"), global("b")),
            vec![Node::assign(
                "a",
                VarKind::Global,
                0,
                Node::binary('+', global("a"), Node::int(1)),
            )],
        )],
    );

    let mut expected = vec![
        "\t.data",
        "a:\t.word\t0",
        "b:\t.word\t0",
        "",
        "\t.text",
        "",
        "program:",
        "\tb\t.LL101",
        ".LL100:",
        "\tlw\tt0, a",
    ];
    expected.extend(PUSH);
    expected.push("\tli\tt0, 1");
    expected.extend(POP_T1);
    expected.extend(["\tadd\tt0, t1, t0", "\tsw\tt0, a, t1", ".LL101:", "\tlw\tt0, a"]);
    expected.extend(PUSH);
    expected.push("\tlw\tt0, b");
    expected.extend(POP_T1);
    expected.push("\tblt\tt1, t0, .LL100");
    expected.extend(EXIT);

    assert_eq!(bare(&program), asm(&expected));
}

#[test]
fn test_empty_if_else() {
    let program = Node::program(
        vec![],
        vec![],
        vec![Node::if_then(
            Node::relational('=', Node::int(1), Node::int(2)),
            vec![],
            vec![],
        )],
    );

    let mut expected = vec!["\t.text", "", "program:", "\tli\tt0, 1"];
    expected.extend(PUSH);
    expected.push("\tli\tt0, 2");
    expected.extend(POP_T1);
    expected.extend(["\tbeq\tt1, t0, .LL100", "\tb\t.LL101", ".LL100:", ".LL101:"]);
    expected.extend(EXIT);

    assert_eq!(bare(&program), asm(&expected));
}

#[test]
fn test_else_branch_precedes_then_branch() {
    // if (x > 0) x = 1; else x = 2;
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![Node::if_then(
            Node::relational('>', global("x"), Node::int(0)),
            vec![Node::assign("x", VarKind::Global, 0, Node::int(1))],
            vec![Node::assign("x", VarKind::Global, 0, Node::int(2))],
        )],
    );
    let out = bare(&program);

    let branch = out.find("\tbgt\tt1, t0, .LL100\n").unwrap();
    let else_store = out.find("\tli\tt0, 2\n").unwrap();
    let jump_end = out.find("\tb\t.LL101\n").unwrap();
    let then_label = out.find(".LL100:\n").unwrap();
    let then_store = out.find("\tli\tt0, 1\n\tsw").unwrap();
    let end_label = out.find(".LL101:\n").unwrap();
    assert!(branch < else_store);
    assert!(else_store < jump_end);
    assert!(jump_end < then_label);
    assert!(then_label < then_store);
    assert!(then_store < end_label);
}

#[test]
fn test_call_with_params() {
    // f(p, q) { x = p + q; }   f(1, 2);
    let f = Node::function(
        "f",
        vec![
            Node::param("p", DataType::Int, 0),
            Node::param("q", DataType::Int, 1),
        ],
        vec![],
        vec![Node::assign(
            "x",
            VarKind::Global,
            0,
            Node::binary(
                '+',
                Node::var("p", VarKind::Param, 0),
                Node::var("q", VarKind::Param, 1),
            ),
        )],
    );
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![f],
        vec![Node::call("f", vec![Node::int(1), Node::int(2)])],
    );

    let mut expected = vec![
        "\t.data",
        "x:\t.word\t0",
        "",
        "\t.text",
        "",
        "program:",
        "\tli\tt0, 1",
    ];
    expected.extend(PUSH);
    expected.extend([
        "\tli\tt0, 2",
        "\tmv\ta1, t0",
        "\tlw\ta0, 0(sp)",
        "\taddi\tsp, sp, 4",
        "\tjal\tf",
    ]);
    expected.extend(EXIT);
    expected.extend([
        "",
        "f:",
        "\taddi\tsp, sp, -128",
        "\tsw\tra, 0(sp)",
        "\tsw\tfp, 4(sp)",
        "\tmv\tfp, sp",
        "\tsw\ta0, 8(fp)",
        "\tsw\ta1, 12(fp)",
        "\tlw\tt0, 8(fp)",
    ]);
    expected.extend(PUSH);
    expected.push("\tlw\tt0, 12(fp)");
    expected.extend(POP_T1);
    expected.extend([
        "\tadd\tt0, t1, t0",
        "\tsw\tt0, x, t1",
        "\tmv\tsp, fp",
        "\tlw\tra, 0(sp)",
        "\tlw\tfp, 4(sp)",
        "\taddi\tsp, sp, 128",
        "\tret",
    ]);

    assert_eq!(bare(&program), asm(&expected));
}

#[test]
fn test_arguments_evaluated_before_registers_written() {
    // x = readInt(); f(7, <value readInt returned>);
    let f = Node::function("f", vec![], vec![], vec![]);
    let program = Node::program(
        vec![],
        vec![f],
        vec![
            Node::call("readInt", vec![]),
            Node::call("f", vec![Node::int(7), Node::return_value()]),
        ],
    );
    let out = generate_to_string(&program, &CodegenOptions::bare().with_runtime(true)).unwrap();

    let mut expected = vec!["\tjal\treadInt", "\tli\tt0, 7"];
    expected.extend(PUSH);
    expected.extend([
        "\tmv\tt0, a0",
        "\tmv\ta1, t0",
        "\tlw\ta0, 0(sp)",
        "\taddi\tsp, sp, 4",
        "\tjal\tf",
    ]);
    assert!(out.contains(&asm(&expected)), "{out}");
}

#[test]
fn test_three_arguments_pop_in_reverse() {
    let f = Node::function("f", vec![], vec![], vec![]);
    let program = Node::program(
        vec![],
        vec![f],
        vec![Node::call("f", vec![Node::int(1), Node::int(2), Node::int(3)])],
    );

    let mut expected = vec!["\tli\tt0, 1"];
    expected.extend(PUSH);
    expected.push("\tli\tt0, 2");
    expected.extend(PUSH);
    expected.extend([
        "\tli\tt0, 3",
        "\tmv\ta2, t0",
        "\tlw\ta1, 0(sp)",
        "\taddi\tsp, sp, 4",
        "\tlw\ta0, 0(sp)",
        "\taddi\tsp, sp, 4",
        "\tjal\tf",
    ]);
    assert!(bare(&program).contains(&asm(&expected)));
}

#[test]
fn test_locals_and_custom_frame() {
    // g() { int t; t = 5; }
    let g = Node::function(
        "g",
        vec![],
        vec![Node::local("t", DataType::Int, 0)],
        vec![Node::assign("t", VarKind::Local, 0, Node::int(5))],
    );
    let program = Node::program(vec![], vec![g], vec![]);
    let out = generate_to_string(&program, &CodegenOptions::bare().with_frame_size(64)).unwrap();

    assert!(out.contains("g:\n\taddi\tsp, sp, -64\n"));
    assert!(out.contains("\tli\tt0, 5\n\tsw\tt0, 8(fp)\n"));
    assert!(out.ends_with("\taddi\tsp, sp, 64\n\tret\n"));
}

#[test]
fn test_global_array_store_and_load() {
    // arr[3] = 42; x = arr[3];
    let program = Node::program(
        vec![
            Node::global_array("arr", 10),
            Node::global("x", DataType::Int),
        ],
        vec![],
        vec![
            Node::assign_index("arr", Node::int(3), Node::int(42)),
            Node::assign("x", VarKind::Global, 0, Node::var_index("arr", Node::int(3))),
        ],
    );

    let mut expected = vec![
        "\t.data",
        "arr:\t.space\t40",
        "x:\t.word\t0",
        "",
        "\t.text",
        "",
        "program:",
        "\tli\tt0, 42",
    ];
    expected.extend(PUSH);
    expected.extend([
        "\tli\tt0, 3",
        "\tslli\tt0, t0, 2",
        "\tla\tt1, arr",
        "\tadd\tt1, t1, t0",
        "\tlw\tt0, 0(sp)",
        "\taddi\tsp, sp, 4",
        "\tsw\tt0, 0(t1)",
        "\tli\tt0, 3",
        "\tslli\tt0, t0, 2",
        "\tla\tt1, arr",
        "\tadd\tt1, t1, t0",
        "\tlw\tt0, 0(t1)",
        "\tsw\tt0, x, t1",
    ]);
    expected.extend(EXIT);

    assert_eq!(bare(&program), asm(&expected));
}

#[test]
fn test_strings_and_runtime_calls() {
    // printStr("hi\n"); x = readInt();
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![
            Node::call("printStr", vec![Node::string(0, "hi\n")]),
            Node::call("readInt", vec![]),
            Node::assign("x", VarKind::Global, 0, Node::return_value()),
        ],
    );
    let options = CodegenOptions::bare().with_runtime(true);
    let out = generate_to_string(&program, &options).unwrap();

    assert!(out.starts_with("\t.data\nx:\t.word\t0\n.SC0:\t.string\t\"hi\\n\"\n\n"));
    assert!(out.contains("\tla\tt0, .SC0\n\tmv\ta0, t0\n\tjal\tprintStr\n"));
    assert!(out.contains("\tjal\treadInt\n\tmv\tt0, a0\n\tsw\tt0, x, t1\n"));
    assert!(out.contains("\nprintStr:\n\tli\ta7, 4\n\tecall\n\tret\n"));
}

#[test]
fn test_annotations() {
    let f = Node::function("f", vec![], vec![], vec![]);
    let program = Node::program(
        vec![],
        vec![f],
        vec![Node::while_loop(
            Node::relational('!', Node::int(0), Node::int(0)),
            vec![],
        )],
    );
    let out = generate_to_string(&program, &CodegenOptions::default()).unwrap();

    assert!(out.contains("# while loop\n\tb\t.LL101\n"));
    assert!(out.contains("\tbne\tt1, t0, .LL100\n"));
    assert!(out.contains("# exit\n"));
    assert!(out.contains("# function f\nf:\n"));
}

#[test]
fn test_arithmetic_mnemonics() {
    for (op, mnemonic) in [('+', "add"), ('-', "sub"), ('*', "mul"), ('/', "div"), ('%', "rem")] {
        let program = Node::program(
            vec![Node::global("x", DataType::Int)],
            vec![],
            vec![Node::assign(
                "x",
                VarKind::Global,
                0,
                Node::binary(op, Node::int(7), Node::int(2)),
            )],
        );
        let expected = format!("\t{mnemonic}\tt0, t1, t0\n");
        assert!(bare(&program).contains(&expected), "operator {op}");
    }
}

// Failure cases

#[test]
fn test_unknown_operator() {
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![Node::assign(
            "x",
            VarKind::Global,
            0,
            Node::binary('^', Node::int(1), Node::int(2)),
        )],
    );
    assert!(matches!(
        bare_err(&program),
        CodegenError::UnknownOperator {
            node: NodeKind::Expression,
            op: '^'
        }
    ));

    let program = Node::program(
        vec![],
        vec![],
        vec![Node::while_loop(
            Node::relational('?', Node::int(1), Node::int(2)),
            vec![],
        )],
    );
    assert!(matches!(
        bare_err(&program),
        CodegenError::UnknownOperator {
            node: NodeKind::RelExpr,
            op: '?'
        }
    ));
}

#[test]
fn test_undefined_function() {
    let program = Node::program(vec![], vec![], vec![Node::call("nowhere", vec![])]);
    let err = bare_err(&program);
    assert_eq!(err.category(), ErrorCategory::MalformedTree);
    assert!(matches!(err, CodegenError::UndefinedFunction { name } if name == "nowhere"));
}

#[test]
fn test_runtime_routines_need_runtime() {
    let program = Node::program(vec![], vec![], vec![Node::call("printInt", vec![Node::int(1)])]);
    assert!(matches!(bare_err(&program), CodegenError::UndefinedFunction { .. }));
    assert!(generate_to_string(&program, &CodegenOptions::default()).is_ok());
}

#[test]
fn test_duplicate_function() {
    let program = Node::program(
        vec![],
        vec![
            Node::function("f", vec![], vec![], vec![]),
            Node::function("f", vec![], vec![], vec![]),
        ],
        vec![],
    );
    assert!(matches!(bare_err(&program), CodegenError::DuplicateFunction { name } if name == "f"));
}

#[test]
fn test_label_clashes() {
    let empty_fn = |name: &'static str| Node::function(name, vec![], vec![], vec![]);
    let with_runtime = CodegenOptions::bare().with_runtime(true);

    let program = Node::program(vec![], vec![empty_fn("program")], vec![]);
    assert!(matches!(
        bare_err(&program),
        CodegenError::ReservedLabel { name } if name == "program"
    ));

    let program = Node::program(vec![], vec![empty_fn("printInt")], vec![]);
    assert!(matches!(
        generate_to_string(&program, &with_runtime).unwrap_err(),
        CodegenError::ReservedLabel { name } if name == "printInt"
    ));

    let program = Node::program(
        vec![
            Node::global("x", DataType::Int),
            Node::global("x", DataType::Int),
        ],
        vec![],
        vec![],
    );
    assert!(matches!(
        bare_err(&program),
        CodegenError::DuplicateGlobal { name } if name == "x"
    ));

    let program = Node::program(
        vec![Node::global("f", DataType::Int)],
        vec![empty_fn("f")],
        vec![],
    );
    assert!(matches!(
        bare_err(&program),
        CodegenError::DuplicateGlobal { name } if name == "f"
    ));
}

#[test]
fn test_negative_string_id() {
    let program = Node::program(
        vec![],
        vec![],
        vec![Node::call("printStr", vec![Node::string(-1, "bad")])],
    );
    let err = generate_to_string(&program, &CodegenOptions::default()).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidStringId { id: -1 }));
}

#[test]
fn test_missing_child() {
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![Node::Assignment {
            name: "x".into(),
            ty: DataType::Int,
            kind: VarKind::Global,
            slot: 0,
            value: None,
            index: None,
        }],
    );
    assert!(matches!(
        bare_err(&program),
        CodegenError::MissingChild {
            node: NodeKind::Assignment,
            ..
        }
    ));
}

#[test]
fn test_relational_outside_condition() {
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![Node::assign(
            "x",
            VarKind::Global,
            0,
            Node::relational('<', Node::int(1), Node::int(2)),
        )],
    );
    assert!(matches!(bare_err(&program), CodegenError::RelationalOutsideCondition));
}

#[test]
fn test_condition_must_be_relational() {
    let program = Node::program(vec![], vec![], vec![Node::while_loop(Node::int(1), vec![])]);
    assert!(matches!(
        bare_err(&program),
        CodegenError::UnexpectedNode {
            found: NodeKind::Constant,
            ..
        }
    ));
}

#[test]
fn test_frame_access_outside_function() {
    let program = Node::program(
        vec![],
        vec![],
        vec![Node::assign("t", VarKind::Local, 0, Node::int(1))],
    );
    assert!(matches!(
        bare_err(&program),
        CodegenError::FrameAccessOutsideFunction { name } if name == "t"
    ));
}

#[test]
fn test_frame_overflow() {
    let g = Node::function(
        "g",
        vec![],
        vec![Node::local("big", DataType::Int, 40)],
        vec![],
    );
    let program = Node::program(vec![], vec![g], vec![]);
    assert!(matches!(
        bare_err(&program),
        CodegenError::FrameOverflow {
            slot: 40,
            frame_size: 128
        }
    ));
}

#[test]
fn test_too_many_arguments() {
    let f = Node::function("f", vec![], vec![], vec![]);
    let args = (0..9).map(Node::int).collect();
    let program = Node::program(vec![], vec![f], vec![Node::call("f", args)]);
    assert!(matches!(
        bare_err(&program),
        CodegenError::TooManyArguments { count: 9, max: 8, .. }
    ));
}

#[test]
fn test_argument_register_must_match_position() {
    let f = Node::function("f", vec![], vec![], vec![]);
    let call = Node::FunCall {
        name: "f".into(),
        args: vec![Node::Argument {
            expr: Some(Box::new(Node::int(1))),
            register: 1,
        }],
    };
    let program = Node::program(vec![], vec![f], vec![call]);
    assert!(matches!(
        bare_err(&program),
        CodegenError::ArgumentOrder {
            position: 0,
            register: 1,
            ..
        }
    ));
}

#[test]
fn test_unsupported_constants() {
    let long = Node::Constant {
        ty: DataType::Long,
        value: 1,
        text: None,
    };
    for value in [long, Node::int(1 << 40)] {
        let program = Node::program(
            vec![Node::global("x", DataType::Int)],
            vec![],
            vec![Node::assign("x", VarKind::Global, 0, value)],
        );
        let err = bare_err(&program);
        assert!(matches!(
            err,
            CodegenError::UnsupportedType { .. } | CodegenError::ConstantOutOfRange { .. }
        ));
    }
}

#[test]
fn test_deep_nesting_fails_cleanly() {
    // x = 1 + (1 + (1 + ...)), far deeper than the limit.
    let mut expr = Node::int(1);
    for _ in 0..20_000 {
        expr = Node::binary('+', Node::int(1), expr);
    }
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![Node::assign("x", VarKind::Global, 0, expr)],
    );

    let err = bare_err(&program);
    assert_eq!(err.category(), ErrorCategory::ResourceExhausted);
    assert!(matches!(err, CodegenError::NestingTooDeep { limit: 4096 }));

    release(Some(program));
}

#[test]
fn test_sink_untouched_on_failure() {
    // The first statement is fine; the second fails.
    let program = Node::program(
        vec![Node::global("x", DataType::Int)],
        vec![],
        vec![
            Node::assign("x", VarKind::Global, 0, Node::int(1)),
            Node::call("missing", vec![]),
        ],
    );
    let mut out = Vec::new();
    assert!(generate_with(&program, &CodegenOptions::default(), &mut out).is_err());
    assert!(out.is_empty());
}
