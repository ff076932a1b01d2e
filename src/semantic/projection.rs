//! 投影字段的收集。

use crate::{
    frontend::ast::{OpDecl, SortExpr},
    library::Projection,
};

/// 收集所有带标签的定义域位置，同名字段合并为一项。
pub fn collect_projections<'a>(
    functions: impl IntoIterator<Item = &'a OpDecl>,
) -> Vec<Projection> {
    let mut fields: Vec<Projection> = vec![];
    for op in functions {
        let SortExpr::Arrow { domain, .. } = &op.sort else {
            continue;
        };
        for (index, position) in domain.positions.iter().enumerate() {
            let Some(label) = &position.label else {
                continue;
            };
            let case = (op.label.to_string(), index);
            match fields.iter_mut().find(|field| field.name == label.as_str()) {
                Some(field) => {
                    if !field.cases.contains(&case) {
                        field.cases.push(case);
                    }
                }
                None => fields.push(Projection {
                    name: label.to_string(),
                    cases: vec![case],
                }),
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::tests::spec;

    #[test]
    fn shared_fields_merge() {
        let local = spec(
            "sort Tree <\"tree\">; Nat <\"nat\">;\n\
             cons leaf <\"leaf\"> : Nat <\"value\"> -> Tree;\n\
                  node <\"node\"> : Tree <\"left\"> # Nat <\"value\"> # Tree <\"right\"> -> Tree;\n\
             map size <\"size\"> : Tree -> Nat;",
        );
        let fields = collect_projections(local.functions());
        let names = fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["value", "left", "right"]);
        assert_eq!(
            fields[0].cases,
            vec![("leaf".to_string(), 0), ("node".to_string(), 1)]
        );
        assert_eq!(fields[2].cases, vec![("node".to_string(), 2)]);
    }

    #[test]
    fn duplicate_declarations_collapse() {
        let local = spec(
            "sort S <\"s\">;\n\
             cons c <\"c\"> : S <\"x\"> -> S; c <\"c\"> : S <\"x\"> -> S;",
        );
        let fields = collect_projections(local.functions());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].cases, vec![("c".to_string(), 0)]);
    }

    #[test]
    fn unlabelled_positions_keep_their_index() {
        let local = spec("sort S <\"s\">; cons c <\"c\"> : S # S <\"second\"> -> S;");
        let fields = collect_projections(local.functions());
        assert_eq!(fields[0].cases, vec![("c".to_string(), 1)]);
    }
}
