//! Pasquim Compiler Library
//!
//! Compiles a small subset of Scheme ahead of time to 32-bit x86 assembly
//! and, through an external C toolchain, to a native executable.
//!
//! The pipeline is strictly linear: source text is tokenized and parsed
//! into an [`Expr`] tree, the code generator walks the tree emitting
//! assembly lines, and the resulting `compiled.s` is handed together with
//! the embedded C runtime to the system compiler:
//!
//! ```text
//! gcc -fomit-frame-pointer -m32 <out>/compiled.s <out>/rts.c -o <out>/a.out
//! ```
//!
//! The runtime's `main` calls the generated `scheme_entry`, decodes the
//! returned tagged word, and prints it. Use [`compile_to_asm`] for the
//! assembly text alone, [`compile_program`] for a runnable binary.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod immediate;
pub mod parser;

pub use ast::Expr;
pub use codegen::{CodeGen, CodeGenError, WORDSIZE};
pub use config::CompilerConfig;
pub use immediate::{Immediate, encode};
pub use parser::{Parser, SyntaxError, tokenize};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Embedded C runtime, written next to the assembly before linking.
/// Its tag constants mirror `immediate.rs` (keep in sync).
static RUNTIME_SRC: &str = include_str!("../runtime/rts.c");

/// Cache for the toolchain probe. Stores the probed command and its
/// result; the common case of one toolchain per process probes once.
static TOOLCHAIN_CHECKED: OnceLock<(String, Result<(), String>)> = OnceLock::new();

/// Error raised by a compilation, fatal to that compilation.
///
/// The kinds match the pipeline stages: what the parser rejects, what the
/// code generator rejects, and what the external toolchain reports.
#[derive(Debug)]
pub enum CompileError {
    /// The source text does not form a single well-parenthesized expression
    Syntax(SyntaxError),
    /// The tree is not compilable (unknown operator, arity, shape)
    CodeGen(CodeGenError),
    /// Reading sources or writing output files failed
    Io(String),
    /// The external assembler/linker is missing or exited non-zero
    Toolchain(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(e) => write!(f, "syntax error: {}", e),
            CompileError::CodeGen(e) => write!(f, "{}", e),
            CompileError::Io(msg) => write!(f, "{}", msg),
            CompileError::Toolchain(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<SyntaxError> for CompileError {
    fn from(e: SyntaxError) -> Self {
        CompileError::Syntax(e)
    }
}

impl From<CodeGenError> for CompileError {
    fn from(e: CodeGenError) -> Self {
        CompileError::CodeGen(e)
    }
}

/// Compile a program string to assembly text.
///
/// This is the compiler's deliverable; everything past it is delegation
/// to the external toolchain.
pub fn compile_to_asm(source: &str) -> Result<String, CompileError> {
    let program = Parser::new(source).parse()?;
    let mut codegen = CodeGen::new();
    Ok(codegen.codegen_program(&program)?)
}

/// Compile a program string and write `compiled.s` into `out_dir`,
/// creating the directory if needed. Returns the assembly path.
pub fn emit_asm_file(source: &str, out_dir: &Path) -> Result<PathBuf, CompileError> {
    let asm = compile_to_asm(source)?;

    fs::create_dir_all(out_dir).map_err(|e| {
        CompileError::Io(format!(
            "Failed to create output directory {}: {}",
            out_dir.display(),
            e
        ))
    })?;

    let asm_path = out_dir.join("compiled.s");
    fs::write(&asm_path, asm)
        .map_err(|e| CompileError::Io(format!("Failed to write {}: {}", asm_path.display(), e)))?;
    Ok(asm_path)
}

/// Compile a program string all the way to a native executable.
///
/// Writes `compiled.s` and the embedded runtime into `out_dir`, then
/// assembles and links them with the configured toolchain. Returns the
/// path of the produced `a.out`.
pub fn compile_program(
    source: &str,
    out_dir: &Path,
    config: &CompilerConfig,
) -> Result<PathBuf, CompileError> {
    let asm_path = emit_asm_file(source, out_dir)?;

    let runtime_path = out_dir.join("rts.c");
    fs::write(&runtime_path, RUNTIME_SRC).map_err(|e| {
        CompileError::Io(format!(
            "Failed to write runtime {}: {}",
            runtime_path.display(),
            e
        ))
    })?;

    check_toolchain(&config.cc).map_err(CompileError::Toolchain)?;

    let exe_path = out_dir.join("a.out");
    let output = Command::new(&config.cc)
        .args(&config.cc_flags)
        .arg(&asm_path)
        .arg(&runtime_path)
        .arg("-o")
        .arg(&exe_path)
        .output()
        .map_err(|e| CompileError::Toolchain(format!("Failed to run {}: {}", config.cc, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CompileError::Toolchain(format!(
            "{} exited with {:?}:\n{}",
            config.cc,
            output.status.code(),
            stderr
        )));
    }

    Ok(exe_path)
}

/// Compile a source file to a native executable in `out_dir`.
pub fn compile_file(
    source_path: &Path,
    out_dir: &Path,
    config: &CompilerConfig,
) -> Result<PathBuf, CompileError> {
    let source = fs::read_to_string(source_path).map_err(|e| {
        CompileError::Io(format!(
            "Failed to read source file {}: {}",
            source_path.display(),
            e
        ))
    })?;
    compile_program(&source, out_dir, config)
}

/// Check that the toolchain command is runnable before handing it work.
///
/// The result for the first command probed is cached for the process; a
/// differently-configured command is probed again.
fn check_toolchain(cc: &str) -> Result<(), String> {
    let (probed, result) = TOOLCHAIN_CHECKED.get_or_init(|| (cc.to_string(), probe_toolchain(cc)));
    if probed == cc {
        result.clone()
    } else {
        probe_toolchain(cc)
    }
}

fn probe_toolchain(cc: &str) -> Result<(), String> {
    let output = Command::new(cc).arg("--version").output().map_err(|e| {
        format!(
            "Failed to run {}: {}. \
             A C toolchain capable of 32-bit output is required \
             (on Debian/Ubuntu: gcc-multilib); \
             set [toolchain] cc in the config to point at one.",
            cc, e
        )
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{} --version failed with exit code {:?}: {}",
            cc,
            output.status.code(),
            stderr
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_to_asm_structure() {
        let asm = compile_to_asm("(primcall add1 41)").unwrap();
        assert!(asm.starts_with(".text\n"));
        assert!(asm.ends_with("ret\n"));
        // every emitted line is newline-terminated, none are blank
        assert!(asm.lines().all(|line| !line.is_empty()));
    }

    #[test]
    fn test_syntax_errors_surface_as_syntax_kind() {
        let err = compile_to_asm("(primcall add1 41").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Syntax(SyntaxError::UnexpectedEof)
        ));
        assert_eq!(err.to_string(), "syntax error: unexpected EOF");
    }

    #[test]
    fn test_semantic_errors_surface_as_codegen_kind() {
        let err = compile_to_asm("(primcall launch-missiles 1)").unwrap_err();
        assert!(matches!(
            err,
            CompileError::CodeGen(CodeGenError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_emit_asm_file_writes_compiled_s() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");

        let asm_path = emit_asm_file("42", &out_dir).unwrap();
        assert_eq!(asm_path, out_dir.join("compiled.s"));

        let written = std::fs::read_to_string(&asm_path).unwrap();
        assert!(written.contains("movl $168, %eax"));
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_no_asm_file_written_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");

        assert!(emit_asm_file("(primcall add1)", &out_dir).is_err());
        assert!(!out_dir.join("compiled.s").exists());
    }

    #[test]
    fn test_runtime_constants_match_immediate_module() {
        // the duplicated constant block in rts.c must stay in sync
        assert!(RUNTIME_SRC.contains("#define FIXNUM_MASK   0x03"));
        assert!(RUNTIME_SRC.contains("#define FIXNUM_SHIFT  2"));
        assert!(RUNTIME_SRC.contains("#define BOOL_TAG      0x0F"));
        assert!(RUNTIME_SRC.contains("#define BOOL_SHIFT    8"));
        assert!(RUNTIME_SRC.contains("#define CHAR_TAG      0x07"));
        assert!(RUNTIME_SRC.contains("#define CHAR_SHIFT    8"));
        assert!(RUNTIME_SRC.contains("scheme_entry"));
    }
}
