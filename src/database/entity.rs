use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, sea_query::SimpleExpr,
};

use crate::core::Queryable;

/// Grid backend over a Sea-ORM entity select, returning the entity's models.
///
/// Filters only ever reach the root `WHERE`; for join-aware grids use
/// [`TableQuery`](crate::database::TableQuery).
#[derive(Debug, Clone)]
pub struct EntityQuery<E: EntityTrait> {
    select: Select<E>,
    condition: Condition,
    orders: Vec<(SimpleExpr, Order)>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl<E: EntityTrait> EntityQuery<E> {
    #[must_use]
    pub fn new(select: Select<E>) -> Self {
        Self {
            select,
            condition: Condition::all(),
            orders: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    fn filtered(&self) -> Select<E> {
        if self.condition.is_empty() {
            self.select.clone()
        } else {
            self.select.clone().filter(self.condition.clone())
        }
    }

    /// The select that [`Queryable::fetch`] would run.
    #[must_use]
    pub fn select(&self) -> Select<E> {
        let mut select = self.filtered();
        for (expr, order) in &self.orders {
            select = select.order_by(expr.clone(), order.clone());
        }
        select.offset(self.offset).limit(self.limit)
    }
}

impl<E: EntityTrait> From<Select<E>> for EntityQuery<E> {
    fn from(select: Select<E>) -> Self {
        Self::new(select)
    }
}

#[async_trait]
impl<E> Queryable for EntityQuery<E>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    type Row = E::Model;

    fn filter(&mut self, condition: Condition) {
        self.condition = std::mem::replace(&mut self.condition, Condition::all()).add(condition);
    }

    fn order_by(&mut self, expr: SimpleExpr, order: Order) {
        self.orders.push((expr, order));
    }

    fn paginate(&mut self, offset: u64, limit: u64) {
        self.offset = Some(offset);
        self.limit = Some(limit);
    }

    async fn count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        self.filtered().count(db).await
    }

    async fn fetch(self, db: &DatabaseConnection) -> Result<Vec<E::Model>, DbErr> {
        self.select().all(db).await
    }
}
