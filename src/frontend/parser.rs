//! 语法解析器。
//!
//! 在词法单元序列上做递归下降，每个非终结符对应一个方法。`->` 右结合，
//! `#` 左结合且优先级高于 `->`，因此 `A # B -> C` 是 `(A # B) -> C`。

use crate::{
    error::SourceError,
    frontend::{
        ast::{
            BinderKind, DataExpr, Domain, DomainPosition, Equation, Ident, Include, OpDecl,
            OpKind, SortDecl, SortExpr, Specification, VarDecl,
        },
        lexer::{Lexeme, Token},
    },
    utils::{Pos, Spanned},
};

/// 从词法单元序列生成语法树。
pub fn parse(tokens: &[Lexeme]) -> Result<Specification, SourceError> {
    Parser { tokens, pos: 0 }.parse_specification()
}

struct Parser<'a> {
    tokens: &'a [Lexeme],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|lexeme| &lexeme.token)
    }

    fn is(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn at_block_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::Sort | Token::Cons | Token::Map | Token::Var | Token::Eqn)
        )
    }

    fn advance(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.tokens.get(self.pos);
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn err(&self, expected: impl Into<String>) -> SourceError {
        let (found, pos) = match self.tokens.get(self.pos) {
            Some(lexeme) => (format!("`{}`", lexeme.token), lexeme.pos),
            None => (
                "end of input".to_string(),
                self.tokens.last().map(|l| l.pos).unwrap_or_default(),
            ),
        };
        SourceError::Syntax {
            expected: expected.into(),
            found,
            pos,
        }
    }

    fn expect(&mut self, token: Token) -> Result<Pos, SourceError> {
        if self.is(&token) {
            if let Some(lexeme) = self.advance() {
                return Ok(lexeme.pos);
            }
        }
        Err(self.err(format!("`{}`", token)))
    }

    fn take_ident(&mut self, what: &str) -> Result<Ident, SourceError> {
        if let Some(Lexeme {
            token: Token::Ident(name),
            pos,
        }) = self.tokens.get(self.pos)
        {
            self.pos += 1;
            return Ok(Spanned::new(name.clone(), *pos));
        }
        Err(self.err(what))
    }

    fn parse_specification(mut self) -> Result<Specification, SourceError> {
        let mut includes = vec![];
        while self.is(&Token::Include) {
            self.advance();
            let path = self.take_ident("an include path")?;
            let pos = path.pos;
            let path = path.trim_matches('"').to_string();
            includes.push(Include {
                path: Spanned::new(path, pos),
            });
        }

        self.expect(Token::Sort)?;
        let sorts = self.parse_block(Self::parse_sort_decl)?;

        let mut constructors = vec![];
        if self.is(&Token::Cons) {
            self.advance();
            constructors = self.parse_block(|p| p.parse_op_decl(OpKind::Constructor))?;
        }
        let mut mappings = vec![];
        if self.is(&Token::Map) {
            self.advance();
            mappings = self.parse_block(|p| p.parse_op_decl(OpKind::Mapping))?;
        }
        let mut variables = vec![];
        if self.is(&Token::Var) {
            self.advance();
            variables = self.parse_block(Self::parse_var_decl)?;
        }
        let mut equations = vec![];
        if self.is(&Token::Eqn) {
            self.advance();
            equations = self.parse_block(Self::parse_equation)?;
        }

        if self.peek().is_some() {
            return Err(self.err("end of input"));
        }

        Ok(Specification {
            includes,
            sorts,
            constructors,
            mappings,
            variables,
            equations,
        })
    }

    /// 一个或多个以 `;` 结尾的声明，直到下一个块关键字或输入结束。
    fn parse_block<T>(
        &mut self,
        mut parse_decl: impl FnMut(&mut Self) -> Result<T, SourceError>,
    ) -> Result<Vec<T>, SourceError> {
        let mut decls = vec![];
        loop {
            decls.push(parse_decl(self)?);
            self.expect(Token::Semicolon)?;
            if self.at_block_end() {
                return Ok(decls);
            }
        }
    }

    fn parse_label(&mut self) -> Result<Ident, SourceError> {
        self.expect(Token::LAng)?;
        let label = self.take_ident("a label")?;
        self.expect(Token::RAng)?;
        Ok(label)
    }

    fn parse_sort_decl(&mut self) -> Result<SortDecl, SourceError> {
        let name = self.take_ident("a sort name")?;
        let param = if self.is(&Token::LBrack) {
            self.advance();
            let param = self.take_ident("a sort parameter")?;
            self.expect(Token::RBrack)?;
            Some(param)
        } else {
            None
        };
        let label = self.parse_label()?;
        Ok(SortDecl { name, param, label })
    }

    fn parse_op_decl(&mut self, kind: OpKind) -> Result<OpDecl, SourceError> {
        let name = self.take_ident("an operator name")?;
        let label = self.parse_label()?;
        self.expect(Token::Colon)?;
        let sort = self.parse_sort_expr()?;
        Ok(OpDecl {
            kind,
            name,
            label,
            sort,
        })
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, SourceError> {
        let name = self.take_ident("a variable name")?;
        self.expect(Token::Colon)?;
        let sort = self.parse_sort_expr()?;
        Ok(VarDecl { name, sort })
    }

    fn parse_equation(&mut self) -> Result<Equation, SourceError> {
        let first = self.parse_data_expr()?;
        let (condition, lhs) = if self.is(&Token::Arrow) {
            self.advance();
            (first, self.parse_data_expr()?)
        } else {
            let truth = DataExpr::Ident(Spanned::new("true".to_string(), first.pos()));
            (truth, first)
        };
        self.expect(Token::Equals)?;
        let rhs = self.parse_data_expr()?;
        Ok(Equation {
            condition,
            lhs,
            rhs,
        })
    }

    fn parse_sort_expr(&mut self) -> Result<SortExpr, SourceError> {
        let mut positions = vec![self.parse_domain_position()?];
        while self.is(&Token::Hash) {
            self.advance();
            positions.push(self.parse_domain_position()?);
        }

        if self.is(&Token::Arrow) {
            self.advance();
            let codomain = self.parse_sort_expr()?;
            return Ok(SortExpr::Arrow {
                domain: Domain { positions },
                codomain: Box::new(codomain),
            });
        }

        match positions.pop() {
            Some(DomainPosition { sort, label: None }) if positions.is_empty() => Ok(sort),
            _ => Err(self.err("`->`")),
        }
    }

    fn parse_domain_position(&mut self) -> Result<DomainPosition, SourceError> {
        let sort = self.parse_sort_primary()?;
        let label = if self.is(&Token::LAng) {
            Some(self.parse_label()?)
        } else {
            None
        };
        Ok(DomainPosition { sort, label })
    }

    fn parse_sort_primary(&mut self) -> Result<SortExpr, SourceError> {
        if self.is(&Token::LBrack) {
            self.advance();
            let sort = self.parse_sort_expr()?;
            self.expect(Token::RBrack)?;
            return Ok(sort);
        }

        let name = self.take_ident("a sort")?;
        if self.is(&Token::LBrack) {
            self.advance();
            let param = self.take_ident("a sort parameter")?;
            self.expect(Token::RBrack)?;
            return Ok(SortExpr::Param {
                container: name,
                param,
            });
        }
        Ok(SortExpr::Primary(name))
    }

    fn parse_data_expr(&mut self) -> Result<DataExpr, SourceError> {
        let mut expr = self.parse_data_primary()?;
        while self.is(&Token::LBrack) {
            self.advance();
            let mut args = vec![self.parse_data_expr()?];
            while self.is(&Token::Comma) {
                self.advance();
                args.push(self.parse_data_expr()?);
            }
            self.expect(Token::RBrack)?;
            expr = DataExpr::Application {
                head: Box::new(expr),
                args,
            };
        }
        Ok(expr)
    }

    fn parse_data_primary(&mut self) -> Result<DataExpr, SourceError> {
        let kind = match self.peek() {
            Some(Token::Lambda) => BinderKind::Lambda,
            Some(Token::Forall) => BinderKind::Forall,
            Some(Token::Exists) => BinderKind::Exists,
            Some(Token::LBrack) => {
                self.advance();
                let expr = self.parse_data_expr()?;
                self.expect(Token::RBrack)?;
                return Ok(expr);
            }
            Some(Token::Ident(_)) => return Ok(DataExpr::Ident(self.take_ident("a term")?)),
            _ => return Err(self.err("a term")),
        };

        self.advance();
        self.expect(Token::LBrack)?;
        let var = self.parse_var_decl()?;
        self.expect(Token::Comma)?;
        let body = self.parse_data_expr()?;
        self.expect(Token::RBrack)?;
        Ok(DataExpr::Binder {
            kind,
            var,
            body: Box::new(body),
        })
    }
}
