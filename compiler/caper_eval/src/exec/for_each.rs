//! Candidate list construction for `for each`.

use caper_ir::{ExprId, Name, Selector, SortKey, SortOrder, Value, ValueType};

use crate::errors::{loop_variable_misconfigured, EvalError};
use crate::world::World;

use super::expr::{expect_boolean, expect_number};
use super::stmt::Executor;

impl Executor<'_> {
    /// Enumerate, filter and sort the candidates of a `for each` loop.
    ///
    /// The filter and sort key see each candidate through an evaluator
    /// overlay, so the global table is untouched until the first element is
    /// bound. Sorting is stable.
    pub(super) fn materialize(
        &mut self,
        var: Name,
        selector: Selector,
        filter: Option<ExprId>,
        sort: Option<SortKey>,
    ) -> Result<Vec<Value>, EvalError> {
        let expected = if selector.yields_tiles() {
            ValueType::Tile
        } else {
            ValueType::Object
        };
        let declared = self.globals.declared_type(var);
        if declared != Some(expected) {
            return Err(loop_variable_misconfigured(
                &self.ir.name_str(var),
                expected,
                declared,
            ));
        }

        let mut candidates = enumerate(&*self.world, selector);

        if let Some(filter) = filter {
            let mut kept = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                let keep = self.eval(filter, Some((var, candidate)))?;
                if expect_boolean(keep, "for each filter")? {
                    kept.push(candidate);
                }
            }
            candidates = kept;
        }

        if let Some(SortKey { expr, order }) = sort {
            let mut keyed = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                let key = self.eval(expr, Some((var, candidate)))?;
                keyed.push((expect_number(key, "for each sort key")?, candidate));
            }
            match order {
                SortOrder::Ascending => keyed.sort_by(|a, b| a.0.total_cmp(&b.0)),
                SortOrder::Descending => keyed.sort_by(|a, b| b.0.total_cmp(&a.0)),
            }
            candidates = keyed.into_iter().map(|(_, candidate)| candidate).collect();
        }

        Ok(candidates)
    }
}

/// Raw candidates in collection order. Tiles are always row-major.
fn enumerate(world: &dyn World, selector: Selector) -> Vec<Value> {
    match selector {
        Selector::AnyActor => world.actors(None).into_iter().map(Value::object).collect(),
        Selector::Kind(kind) => world
            .actors(Some(kind))
            .into_iter()
            .map(Value::object)
            .collect(),
        Selector::Tiles => {
            let mut tiles = world.tiles();
            tiles.sort_by_key(|tile| tile.row_major_key());
            tiles.into_iter().map(Value::Tile).collect()
        }
    }
}
