use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, sea_query::Expr};
use uuid::Uuid;

use crate::{
    entity::product_quantities::{Column as StockCol, Entity as ProductQuantities},
    entity::products::{Column as ProductCol, Entity as Products},
    error::AppResult,
};

/// Saturating sum so a pathological stock total pins at `i32::MAX` instead of
/// wrapping or truncating.
fn clamped_total<I: IntoIterator<Item = i32>>(quantities: I) -> i32 {
    quantities
        .into_iter()
        .fold(0i32, |acc, quantity| acc.saturating_add(quantity))
}

/// Recomputes `products.total_quantity` from the per-size stock rows.
///
/// Called after any write to `product_quantities` so the cached column never
/// drifts for longer than the enclosing transaction.
pub async fn sync_total_quantity<C: ConnectionTrait>(conn: &C, product_id: Uuid) -> AppResult<()> {
    let total = clamped_total(
        ProductQuantities::find()
            .filter(StockCol::ProductId.eq(product_id))
            .all(conn)
            .await?
            .iter()
            .map(|row| row.quantity),
    );

    Products::update_many()
        .col_expr(ProductCol::TotalQuantity, Expr::value(total))
        .filter(ProductCol::Id.eq(product_id))
        .exec(conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::clamped_total;

    #[test]
    fn sums_ordinary_quantities() {
        assert_eq!(clamped_total([5, 3, 2]), 10);
        assert_eq!(clamped_total([]), 0);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        assert_eq!(clamped_total([i32::MAX, 1]), i32::MAX);
        assert_eq!(clamped_total([i32::MAX - 1, 1, 1]), i32::MAX);
    }
}
