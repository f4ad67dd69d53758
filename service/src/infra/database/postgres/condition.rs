//! SQL rendering of search [`Conditions`].

use itertools::Itertools as _;
use postgres_types::ToSql;

use crate::read::condition::{Conditions, Operator, Predicate, Value};

/// Renders the provided [`Conditions`] as an SQL boolean expression, pushing
/// the bound values into `params`.
///
/// Placeholders are numbered after the values already present in `params`.
pub(crate) fn render<'a>(
    conditions: &'a Conditions,
    params: &mut Vec<&'a (dyn ToSql + Sync)>,
) -> String {
    conditions
        .into_iter()
        .map(|p: &'a Predicate| {
            let column = p.column;
            let (value, ty): (&'a (dyn ToSql + Sync), _) = match &p.value {
                Value::Int(v) => (v, "INT8"),
                Value::Text(v) => (v, "VARCHAR"),
            };
            params.push(value);
            let idx = params.len();

            match p.operator {
                Operator::AtLeast => format!("{column} >= ${idx}::{ty}"),
                Operator::LessThan => format!("{column} < ${idx}::{ty}"),
                Operator::Equals => format!("{column} = ${idx}::{ty}"),
                Operator::Contains => {
                    format!("{column} LIKE '%' || ${idx}::{ty} || '%'")
                }
            }
        })
        .join(" AND ")
}

#[cfg(test)]
mod spec {
    use postgres_types::ToSql;

    use crate::{
        domain::catalog::{Range, RangeCondition},
        read::condition::{Builder, Column},
    };

    use super::render;

    #[test]
    fn numbers_placeholders_after_existing_params() {
        let buckets = RangeCondition {
            prefix: String::new(),
            suffix: String::new(),
            ranges: vec![Range {
                id: 0,
                min: 50_000,
                max: 100_000,
            }],
        };
        let conds = Builder::new()
            .range(Column::Rent, &buckets, "0")
            .unwrap()
            .contains_each(Column::Features, "pet")
            .build()
            .unwrap();

        let limit = 10_i64;
        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&limit];
        let sql = render(&conds, &mut params);

        assert_eq!(
            sql,
            "rent >= $2::INT8 AND rent < $3::INT8 \
             AND features LIKE '%' || $4::VARCHAR || '%'",
        );
        assert_eq!(params.len(), 4);
    }
}
