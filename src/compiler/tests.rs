//! Unit tests for the code generation backends.

use pretty_assertions::assert_eq;

use super::compiler::{available_backends, backend_for, CodegenError};
use crate::{ast::ast::Program, pipeline::compile_source};

fn checked(source: &str) -> Vec<Program> {
    compile_source("main", "t.fr", source).unwrap()
}

#[test]
fn test_tree_output() {
    let programs = checked("func add(a i64, b i64) i64 { return a + b; }\nfunc ext(x f32);");
    let mut backend = backend_for("tree", "main").unwrap();

    assert_eq!(backend.name(), "tree");
    assert_eq!(
        backend.generate_to_string(&programs).unwrap(),
        "(module \"main\"\n\
         \x20 (program \"t.fr\"\n\
         \x20   (func add ((a i64) (b i64)) i64 (block (return (+ a:i64 b:i64):i64)))\n\
         \x20   (func ext ((x f32)) void)\n\
         \x20 )\n\
         )\n"
    );
}

#[test]
fn test_tree_marks_relational_bool() {
    let programs = checked("func f(x f64) bool { { return -x < 2.0; } }");
    let output = backend_for("tree", "main")
        .unwrap()
        .generate_to_string(&programs)
        .unwrap();

    assert!(output.contains("(return (< (- x:f64):f64 2.0:f64):bool)"), "{}", output);
}

#[test]
fn test_json_output() {
    let programs = checked("func main() i64 { return 5; }");
    let output = backend_for("json", "pkg")
        .unwrap()
        .generate_to_string(&programs)
        .unwrap();

    let document: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(document["module"], "pkg");
    assert_eq!(document["programs"][0]["file"], "t.fr");

    let decl = &document["programs"][0]["statements"][0]["FunctionDeclaration"];
    assert_eq!(decl["name"]["lexeme"], "main");
    assert_eq!(decl["return_type"]["Builtin"], "I64");
}

#[test]
fn test_unknown_backend() {
    let error = backend_for("wasm", "main").err().unwrap();

    assert!(matches!(&error, CodegenError::UnknownBackend { id } if id == "wasm"));
    assert!(error.to_string().starts_with("unknown backend \"wasm\", available: tree, json"));
}

#[test]
fn test_available_backends() {
    let backends = available_backends();

    assert!(backends.contains(&"tree"));
    assert!(backends.contains(&"json"));
    assert_eq!(backends.contains(&"llvm"), cfg!(feature = "llvm"));
}

#[cfg(feature = "llvm")]
mod llvm {
    use super::checked;
    use crate::compiler::compiler::{backend_for, CodegenError};

    fn ir(source: &str) -> Result<String, CodegenError> {
        backend_for("llvm", "main")?.generate_to_string(&checked(source))
    }

    #[test]
    fn test_arithmetic() {
        let output = ir("func add(a i64, b i64) i64 { return a + b * 2; }").unwrap();

        assert!(output.contains("define i64 @add(i64 %0, i64 %1)"), "{}", output);
        assert!(output.contains("mul i64 %1, 2"), "{}", output);
        assert!(output.contains("ret i64"), "{}", output);
    }

    #[test]
    fn test_unsigned_comparison() {
        let output = ir("func lt(a u8, b u8) bool { return a < b; }").unwrap();

        assert!(output.contains("icmp ult i8"), "{}", output);
    }

    #[test]
    fn test_float_negation() {
        let output = ir("func neg(x f32) f32 { return -x; }").unwrap();

        assert!(output.contains("fneg float"), "{}", output);
    }

    #[test]
    fn test_void_and_forward_declarations() {
        let output = ir("func main() { 1 + 2; }\nfunc ext(x f64) i32;").unwrap();

        assert!(output.contains("define void @main()"), "{}", output);
        assert!(output.contains("declare i32 @ext(double)"), "{}", output);
    }

    #[test]
    fn test_function_value_is_unsupported() {
        let error = ir("func f() {}\nfunc g() { f; }").err().unwrap();

        assert!(matches!(error, CodegenError::Unsupported { backend: "llvm", .. }));
    }
}
