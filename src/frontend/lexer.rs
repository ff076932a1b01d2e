//! 词法分析器。

use std::fmt::Display;

use pest::Parser;

use crate::{error::SourceError, utils::Pos};

mod grammar {
    #[derive(Parser)]
    #[grammar = "frontend/lexer.pest"]
    pub struct TokenParser;
}

use grammar::{Rule, TokenParser};

/// 词法单元
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Arrow,
    Hash,
    Include,
    Colon,
    Semicolon,
    Comma,
    LBrack,
    RBrack,
    LAng,
    RAng,
    Equals,
    Sort,
    Cons,
    Map,
    Var,
    Eqn,
    Lambda,
    Forall,
    Exists,
    /// 标识符，保留原文
    Ident(String),
}

impl Token {
    /// 按整词匹配固定符号，其余均为标识符。
    fn from_word(word: &str) -> Token {
        match word {
            "=" => Token::Equals,
            "sort" => Token::Sort,
            "cons" => Token::Cons,
            "map" => Token::Map,
            "var" => Token::Var,
            "eqn" => Token::Eqn,
            "lambda" => Token::Lambda,
            "forall" => Token::Forall,
            "exists" => Token::Exists,
            "<\"" => Token::LAng,
            _ => Token::Ident(word.to_string()),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Token::Arrow => "->",
            Token::Hash => "#",
            Token::Include => "#include",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::LBrack => "(",
            Token::RBrack => ")",
            Token::LAng => "<\"",
            Token::RAng => "\">",
            Token::Equals => "=",
            Token::Sort => "sort",
            Token::Cons => "cons",
            Token::Map => "map",
            Token::Var => "var",
            Token::Eqn => "eqn",
            Token::Lambda => "lambda",
            Token::Forall => "forall",
            Token::Exists => "exists",
            Token::Ident(name) => name,
        };
        f.write_str(text)
    }
}

/// 带位置的词法单元
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// 词法单元
    pub token: Token,
    /// 位置
    pub pos: Pos,
}

/// 将源文本切分为词法单元序列。
///
/// 任何无法识别的文本都成为标识符，错误留给语法分析处理。
pub fn tokenize(source: &str) -> Result<Vec<Lexeme>, SourceError> {
    let mut parsed = TokenParser::parse(Rule::Tokens, source).map_err(|err| {
        let (start, end) = match err.location {
            pest::error::InputLocation::Pos(pos) => (pos, pos),
            pest::error::InputLocation::Span(span) => span,
        };
        SourceError::Syntax {
            expected: "a token".to_string(),
            found: err.variant.message().to_string(),
            pos: Pos::new(start, end),
        }
    })?;

    let tokens = match parsed.next() {
        Some(tokens) => tokens.into_inner(),
        None => return Ok(vec![]),
    };

    Ok(tokens
        .filter_map(|pair| {
            let token = match pair.as_rule() {
                Rule::Arrow => Token::Arrow,
                Rule::Include => Token::Include,
                Rule::Hash => Token::Hash,
                Rule::Colon => Token::Colon,
                Rule::Semicolon => Token::Semicolon,
                Rule::Comma => Token::Comma,
                Rule::LBrack => Token::LBrack,
                Rule::RBrack => Token::RBrack,
                Rule::LAng => Token::LAng,
                Rule::RAng => Token::RAng,
                Rule::Word => Token::from_word(pair.as_str()),
                Rule::EOI => return None,
                _ => unreachable!(),
            };
            Some(Lexeme {
                token,
                pos: Pos::from_pest(pair.as_span()),
            })
        })
        .collect())
}
