use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

use crate::db::entities::pokemon;

const LIKE_ESCAPE: char = '\\';

/// Query string of `GET /pokemon`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Case-insensitive substring of name or type
    pub search: Option<String>,
    /// Case-insensitive exact type
    pub filter: Option<String>,
}

impl SearchParams {
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    pub fn filter_term(&self) -> Option<&str> {
        self.filter.as_deref().filter(|s| !s.is_empty())
    }

    /// `(lower(name) LIKE %search% OR lower(type) LIKE %search%) AND lower(type) = filter`,
    /// with either side dropped when its parameter is absent.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = self.search_term() {
            let pattern = contains_pattern(term);
            condition = condition.add(
                Condition::any()
                    .add(lower(pokemon::Column::Name).like(like(&pattern)))
                    .add(lower(pokemon::Column::PokemonType).like(like(&pattern))),
            );
        }

        if let Some(filter) = self.filter_term() {
            condition = condition.add(lower(pokemon::Column::PokemonType).eq(filter.to_lowercase()));
        }

        condition
    }
}

fn lower(column: pokemon::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((pokemon::Entity, column))))
}

fn like(pattern: &str) -> LikeExpr {
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Lower-cased `%term%` with LIKE metacharacters escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
