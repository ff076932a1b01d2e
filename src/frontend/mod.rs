//! 编译器前端

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::error::SourceError;

/// 从文本生成语法树。
pub fn parse_source(source: &str) -> Result<ast::Specification, SourceError> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(&tokens)
}
