//! 标识符与排序的解析。

use std::collections::BTreeMap;

use crate::{
    error::SourceError,
    frontend::ast::{DataExpr, Ident, OpDecl, SortExpr, VarDecl},
    library::SortRef,
};

use super::Scope;

/// 数据表达式中标识符的解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// 内建的布尔字面量，携带其标签
    Literal(&'static str),
    /// 已声明的函数
    Function(&'a OpDecl),
    /// 变量，约束变量或 `var` 块中的声明
    Variable(&'a VarDecl),
}

/// 布尔字面量的标签。
pub fn literal_label(name: &str) -> Option<&'static str> {
    match name {
        "true" => Some("true_"),
        "false" => Some("false_"),
        _ => None,
    }
}

/// 方程中可见的变量
///
/// 约束变量由内向外查找，其次按声明顺序查找 `var` 块。
#[derive(Debug, Clone)]
pub struct Variables<'a> {
    declared: &'a [VarDecl],
    bound: Vec<&'a VarDecl>,
}

impl<'a> Variables<'a> {
    /// 以 `var` 块创建。
    pub fn new(declared: &'a [VarDecl]) -> Self {
        Self {
            declared,
            bound: vec![],
        }
    }

    /// 进入一个约束符。
    pub fn bind(&mut self, var: &'a VarDecl) {
        self.bound.push(var);
    }

    /// 离开最内层的约束符。
    pub fn unbind(&mut self) {
        self.bound.pop();
    }

    /// 查找变量。
    pub fn lookup(&self, name: &str) -> Option<&'a VarDecl> {
        self.bound
            .iter()
            .rev()
            .copied()
            .chain(self.declared.iter())
            .find(|var| var.name.as_str() == name)
    }

    /// 名称是否被某个约束符约束。
    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.iter().any(|var| var.name.as_str() == name)
    }
}

impl<'a> Scope<'a> {
    /// 按名称与期望的元数查找函数符号。
    ///
    /// 声明的元数与期望相同，或期望为零（不带参数地引用一个函数）时匹配。
    pub fn lookup_identifier(&self, name: &str, arity: usize) -> Option<Resolved<'a>> {
        if let Some(label) = literal_label(name) {
            return Some(Resolved::Literal(label));
        }
        self.functions()
            .find(|op| op.name.as_str() == name && (op.arity() == arity || arity == 0))
            .map(Resolved::Function)
    }

    /// 解析数据表达式中的标识符，`arity` 为其被应用的参数个数。
    ///
    /// 依次查找字面量、函数与变量；都找不到时报错。
    pub fn resolve_identifier(
        &self,
        name: &Ident,
        arity: usize,
        variables: &Variables<'a>,
    ) -> Result<Resolved<'a>, SourceError> {
        if let Some(resolved) = self.lookup_identifier(name, arity) {
            return Ok(resolved);
        }
        variables
            .lookup(name)
            .map(Resolved::Variable)
            .ok_or_else(|| SourceError::UnresolvedSymbol {
                name: name.to_string(),
                pos: name.pos,
            })
    }

    /// 表达式中出现的 `var` 块变量，不含被约束的变量，按名称排序。
    pub fn free_variables(
        &self,
        expr: &'a DataExpr,
        variables: &mut Variables<'a>,
    ) -> BTreeMap<String, &'a VarDecl> {
        let mut free = BTreeMap::new();
        self.collect_free_variables(expr, 0, variables, &mut free);
        free
    }

    fn collect_free_variables(
        &self,
        expr: &'a DataExpr,
        arity: usize,
        variables: &mut Variables<'a>,
        free: &mut BTreeMap<String, &'a VarDecl>,
    ) {
        match expr {
            DataExpr::Ident(name) => {
                let resolved = self.resolve_identifier(name, arity, variables);
                if let Ok(Resolved::Variable(var)) = resolved {
                    if !variables.is_bound(name) {
                        free.insert(name.to_string(), var);
                    }
                }
            }
            DataExpr::Application { head, args } => {
                self.collect_free_variables(head, args.len(), variables, free);
                for arg in args {
                    self.collect_free_variables(arg, 0, variables, free);
                }
            }
            DataExpr::Binder { var, body, .. } => {
                variables.bind(var);
                self.collect_free_variables(body, 0, variables, free);
                variables.unbind();
            }
        }
    }

    /// 已声明排序的短标签。
    pub fn sort_label(&self, name: &Ident) -> Result<&'a str, SourceError> {
        self.find_sort(name)
            .map(|sort| sort.label.as_str())
            .ok_or_else(|| SourceError::UnresolvedSort {
                name: name.to_string(),
                pos: name.pos,
            })
    }

    /// 将排序表达式解析为生成代码中的排序。
    pub fn resolve_sort(&self, sort: &SortExpr) -> Result<SortRef, SourceError> {
        match sort {
            SortExpr::Primary(name) => {
                if self.is_parameter(name) {
                    return Ok(SortRef::Param(name.to_string()));
                }
                Ok(SortRef::Basic {
                    label: self.sort_label(name)?.to_string(),
                })
            }
            SortExpr::Arrow { domain, codomain } => Ok(SortRef::Function {
                domain: domain
                    .positions
                    .iter()
                    .map(|position| self.resolve_sort(&position.sort))
                    .collect::<Result<Vec<_>, _>>()?,
                codomain: Box::new(self.resolve_sort(codomain)?),
            }),
            SortExpr::Param { container, param } => {
                let arg = match self.find_sort(param) {
                    Some(sort) => SortRef::Basic {
                        label: sort.label.to_string(),
                    },
                    None => SortRef::Param(param.to_string()),
                };
                Ok(SortRef::Container {
                    label: self.sort_label(container)?.to_string(),
                    arg: Box::new(arg),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{tests::spec, Symbols};

    #[test]
    fn literals_come_first() {
        let local = spec("sort Bool <\"bool_\">; cons true <\"t\"> : Bool;");
        let symbols = Symbols::new();
        let scope = Scope::new(&local, &symbols);
        assert_eq!(scope.lookup_identifier("true", 0), Some(Resolved::Literal("true_")));
    }

    #[test]
    fn arity_selects_overload() {
        let local = spec(
            "sort Nat <\"nat\">;\n\
             map max <\"max1\"> : Nat -> Nat; max <\"max2\"> : Nat # Nat -> Nat;",
        );
        let symbols = Symbols::new();
        let scope = Scope::new(&local, &symbols);
        let label = |arity| match scope.lookup_identifier("max", arity) {
            Some(Resolved::Function(op)) => Some(op.label.to_string()),
            _ => None,
        };
        assert_eq!(label(2).as_deref(), Some("max2"));
        assert_eq!(label(1).as_deref(), Some("max1"));
        assert_eq!(label(0).as_deref(), Some("max1"));
        assert_eq!(label(3), None);
    }

    #[test]
    fn cached_functions_are_visible() {
        let mut symbols = Symbols::new();
        symbols.commit(
            "/bool.spec",
            &spec("sort Bool <\"bool_\">; map not <\"not_\"> : Bool -> Bool;"),
        );
        let local = spec("sort Nat <\"nat\">;");
        let scope = Scope::new(&local, &symbols);
        assert!(matches!(
            scope.lookup_identifier("not", 1),
            Some(Resolved::Function(op)) if op.label.as_str() == "not_"
        ));
    }

    #[test]
    fn sorts_resolve_to_codes() {
        let local = spec(
            "sort Nat <\"nat\">; List(S) <\"list\">;\n\
             map head <\"head\"> : List(S) # Nat -> S; bad <\"bad\"> : Real;",
        );
        let symbols = Symbols::new();
        let scope = Scope::new(&local, &symbols);

        let head = scope.resolve_sort(&local.mappings[0].sort).unwrap();
        assert_eq!(
            head,
            SortRef::Function {
                domain: vec![
                    SortRef::Container {
                        label: "list".to_string(),
                        arg: Box::new(SortRef::Param("S".to_string())),
                    },
                    SortRef::Basic {
                        label: "nat".to_string()
                    },
                ],
                codomain: Box::new(SortRef::Param("S".to_string())),
            }
        );

        let err = scope.resolve_sort(&local.mappings[1].sort).unwrap_err();
        assert_eq!(err.to_string(), "unresolved sort `Real`");
    }

    #[test]
    fn binders_shadow_first_declaration() {
        let local = spec(
            "sort S <\"s\">; T <\"t\">; U <\"u\">; var x: S; x: T;\n\
             eqn lambda(x: U, x) = x;",
        );
        let mut vars = Variables::new(&local.variables);
        assert_eq!(vars.lookup("x").unwrap().sort.to_string(), "S");
        assert!(vars.lookup("y").is_none());

        let binder = match &local.equations[0].lhs {
            DataExpr::Binder { var, .. } => var,
            other => panic!("expected a binder, got {}", other),
        };
        vars.bind(binder);
        assert_eq!(vars.lookup("x").unwrap().sort.to_string(), "U");
        assert!(vars.is_bound("x"));
        vars.unbind();
        assert_eq!(vars.lookup("x").unwrap().sort.to_string(), "S");
    }

    #[test]
    fn applied_identifier_falls_back_to_variable() {
        let local = spec(
            "sort List(S) <\"list\">; Nat <\"nat\">;\n\
             map len <\"len\"> : List(S) # Nat -> Nat;\n\
             var len: Nat -> Nat; n: Nat;\n\
             eqn len(n) = n;",
        );
        let symbols = Symbols::new();
        let scope = Scope::new(&local, &symbols);
        let vars = Variables::new(&local.variables);
        let len = Ident::new("len".to_string(), Default::default());

        assert!(matches!(
            scope.resolve_identifier(&len, 1, &vars),
            Ok(Resolved::Variable(var)) if var.sort.to_string() == "Nat -> Nat"
        ));
        assert!(matches!(
            scope.resolve_identifier(&len, 2, &vars),
            Ok(Resolved::Function(op)) if op.label.as_str() == "len"
        ));

        let mut vars = vars;
        let free = scope.free_variables(&local.equations[0].lhs, &mut vars);
        assert_eq!(free.keys().collect::<Vec<_>>(), vec!["len", "n"]);
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let local = spec("sort Nat <\"nat\">;");
        let symbols = Symbols::new();
        let scope = Scope::new(&local, &symbols);
        let vars = Variables::new(&local.variables);
        let y = Ident::new("y".to_string(), Default::default());
        assert!(matches!(
            scope.resolve_identifier(&y, 0, &vars),
            Err(SourceError::UnresolvedSymbol { name, .. }) if name == "y"
        ));
    }
}
