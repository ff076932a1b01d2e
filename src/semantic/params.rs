//! 排序参数推断。
//!
//! 结果按名称排序，保证生成代码的参数顺序确定。

use std::collections::BTreeSet;

use crate::frontend::ast::{DataExpr, Equation, SortExpr};

use super::{
    resolve::{Resolved, Variables},
    Scope,
};

impl<'a> Scope<'a> {
    /// 排序表达式中出现的排序参数。
    pub fn sort_parameters(&self, sort: &SortExpr) -> BTreeSet<String> {
        let mut params = BTreeSet::new();
        self.collect_sort_parameters(sort, &mut params);
        params
    }

    fn collect_sort_parameters(&self, sort: &SortExpr, params: &mut BTreeSet<String>) {
        match sort {
            SortExpr::Primary(name) => {
                if self.is_parameter(name) {
                    params.insert(name.to_string());
                }
            }
            SortExpr::Arrow { domain, codomain } => {
                for position in &domain.positions {
                    self.collect_sort_parameters(&position.sort, params);
                }
                self.collect_sort_parameters(codomain, params);
            }
            SortExpr::Param { param, .. } => {
                if self.find_sort(param).is_none() {
                    params.insert(param.to_string());
                }
            }
        }
    }

    /// 数据表达式中出现的排序参数，经由函数签名与变量的排序传递。
    pub fn data_parameters(
        &self,
        expr: &'a DataExpr,
        variables: &mut Variables<'a>,
    ) -> BTreeSet<String> {
        let mut params = BTreeSet::new();
        self.collect_data_parameters(expr, 0, variables, &mut params);
        params
    }

    fn collect_data_parameters(
        &self,
        expr: &'a DataExpr,
        arity: usize,
        variables: &mut Variables<'a>,
        params: &mut BTreeSet<String>,
    ) {
        match expr {
            DataExpr::Ident(name) => match self.resolve_identifier(name, arity, variables) {
                Ok(Resolved::Function(op)) => self.collect_sort_parameters(&op.sort, params),
                Ok(Resolved::Variable(var)) => self.collect_sort_parameters(&var.sort, params),
                Ok(Resolved::Literal(_)) | Err(_) => {}
            },
            DataExpr::Application { head, args } => {
                self.collect_data_parameters(head, args.len(), variables, params);
                for arg in args {
                    self.collect_data_parameters(arg, 0, variables, params);
                }
            }
            DataExpr::Binder { var, body, .. } => {
                self.collect_sort_parameters(&var.sort, params);
                variables.bind(var);
                self.collect_data_parameters(body, 0, variables, params);
                variables.unbind();
            }
        }
    }

    /// 一组方程中出现的排序参数，即方程表构造函数的形式参数。
    pub fn equation_parameters(&self, equations: &'a [Equation]) -> BTreeSet<String> {
        let mut variables = Variables::new(&self.spec().variables);
        let mut params = BTreeSet::new();
        for equation in equations {
            for expr in [&equation.condition, &equation.lhs, &equation.rhs] {
                self.collect_data_parameters(expr, 0, &mut variables, &mut params);
            }
        }
        params
    }
}
