//! A compiler from algebraic sort specifications to data library headers.
//!
//! A specification declares a sort, its constructors and mappings, variables and defining
//! equations. [`Context`] compiles a specification file, together with the files it includes,
//! into a C++ header providing sort and function symbol constructors, recognisers, projections
//! and the table of equations.

#![deny(missing_docs)]

extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod error;
pub mod frontend;
pub mod library;
pub mod options;
pub mod semantic;
pub mod utils;

use std::path::{Path, PathBuf};

use colorized::Colors;
use error::{Error, SourceError};
use library::{
    target::{Cpp, Target},
    LibraryBuilder,
};
use options::Options;
use semantic::Symbols;
use utils::trace;

/// 编译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    /// 主排序的完整名称
    pub sort: String,
    /// 主排序的短标签
    pub label: String,
    /// 生成的头文件
    pub code: String,
}

/// 编译器上下文
///
/// 在多次编译之间保留已编译文件的声明，每个文件至多编译一次。
#[derive(Default)]
pub struct Context {
    symbols: Symbols,
    options: Options,
    stack: Vec<PathBuf>,
}

impl Context {
    /// 创建一个新的编译器上下文。
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置编译选项。
    pub fn set_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// 已编译文件的声明。
    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// 编译文件及其包含的文件，返回该文件的头文件。
    pub fn compile_file(&mut self, path: impl AsRef<Path>) -> Result<Compiled, Error> {
        let path = path.as_ref();
        let canonical = path.canonicalize().map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(start) = self.stack.iter().position(|p| *p == canonical) {
            let mut chain = self.stack[start..].to_vec();
            chain.push(canonical);
            return Err(Error::IncludeCycle { chain });
        }

        let source = std::fs::read_to_string(&canonical).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.stack.push(canonical.clone());
        let compiled = self.compile_source(&canonical, &source);
        self.stack.pop();
        compiled
    }

    /// 编译一段源文本，`path` 用于诊断信息与解析相对的包含路径。
    pub fn compile_source(
        &mut self,
        path: impl AsRef<Path>,
        source: &str,
    ) -> Result<Compiled, Error> {
        let path = path.as_ref();
        if self.options.verbose {
            trace(self.options.color, "compiling", Colors::GreenFg, path.display());
        }
        let located = |error: SourceError| self.located(path, source, error);

        let tokens = frontend::lexer::tokenize(source).map_err(located)?;
        if self.options.debug {
            for lexeme in &tokens {
                trace(self.options.color, "token", Colors::BrightBlackFg, &lexeme.token);
            }
        }
        let spec = frontend::parser::parse(&tokens).map_err(located)?;
        if self.options.debug {
            trace(self.options.color, "parsed", Colors::BrightBlackFg, format!("\n{}", spec));
        }

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut included = vec![];
        for include in &spec.includes {
            let target = base.join(include.path.as_str());
            let canonical = target.canonicalize().map_err(|source| Error::Io {
                path: target.clone(),
                source,
            })?;
            if self.symbols.is_compiled(&canonical) {
                if self.options.verbose {
                    trace(
                        self.options.color,
                        "skipping",
                        Colors::BrightBlackFg,
                        format!("{} (already compiled)", target.display()),
                    );
                }
            } else {
                let compiled = self.compile_file(&target)?;
                if self.options.verbose {
                    trace(
                        self.options.color,
                        "included",
                        Colors::BrightBlackFg,
                        format!("{} defines {}", target.display(), compiled.sort),
                    );
                }
            }
            included.push(canonical);
        }

        let mut builder = LibraryBuilder::new(&spec, &self.symbols);
        for canonical in &included {
            if let (Some(sort), Some(label)) = (
                self.symbols.principal_sort(canonical),
                self.symbols.principal_label(canonical),
            ) {
                builder.include(sort, label);
            }
        }
        let library = builder
            .build()
            .map_err(|error| self.located(path, source, error))?;
        let code = Cpp::render(&library, &self.options).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.symbols.commit(path, &spec);
        Ok(Compiled {
            sort: library.sort,
            label: library.label,
            code,
        })
    }

    fn located(&self, path: &Path, source: &str, error: SourceError) -> Error {
        let filename = path.display().to_string();
        let snippet = error.to_snippet(&filename, source, self.options.color);
        Error::Source {
            path: path.to_path_buf(),
            error,
            snippet,
        }
    }
}
