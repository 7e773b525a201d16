use async_trait::async_trait;
use sea_orm::sea_query::{
    Alias, Asterisk, Expr, Func, IntoCondition, JoinType, Query, SelectStatement, SimpleExpr,
};
use sea_orm::{Condition, ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, Order};
use std::marker::PhantomData;

use crate::core::Queryable;
use crate::filtering::PhysicalColumn;

const COUNT_ALIAS: &str = "count";

/// `left = right` between two (optionally table-qualified) columns, for join
/// conditions.
///
/// ```
/// use gridcrate::database::columns_equal;
///
/// let on = columns_equal("c.id", "i.category_id");
/// ```
#[must_use]
pub fn columns_equal(left: &str, right: &str) -> SimpleExpr {
    Expr::col(PhysicalColumn::parse(left).column_ref())
        .equals(PhysicalColumn::parse(right).column_ref())
}

#[derive(Debug, Clone)]
struct Join {
    kind: JoinType,
    table: String,
    alias: String,
    on: Condition,
    scoped: Vec<Condition>,
}

impl Join {
    fn condition(&self) -> Condition {
        if self.scoped.is_empty() {
            return self.on.clone();
        }
        self.scoped
            .iter()
            .cloned()
            .fold(Condition::all().add(self.on.clone()), Condition::add)
    }
}

/// Grid backend over a hand-assembled `SELECT` with named joins, returning
/// rows of any [`FromQueryResult`] type.
///
/// Join aliases are scopes: a join-aware grid attaches predicates on a joined
/// table to that join's `ON` clause.
///
/// ```rust,ignore
/// let query = TableQuery::<ItemRow>::new("items", "i")
///     .select("i.id", "id")
///     .select("i.name", "name")
///     .select("c.name", "category_name")
///     .left_join("categories", "c", columns_equal("c.id", "i.category_id"));
/// ```
#[derive(Debug, Clone)]
pub struct TableQuery<R> {
    table: String,
    alias: String,
    columns: Vec<(SimpleExpr, String)>,
    joins: Vec<Join>,
    condition: Condition,
    orders: Vec<(SimpleExpr, Order)>,
    offset: Option<u64>,
    limit: Option<u64>,
    row: PhantomData<fn() -> R>,
}

impl<R> TableQuery<R> {
    /// Root table and its alias. Selects `*` until columns are added.
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            condition: Condition::all(),
            orders: Vec::new(),
            offset: None,
            limit: None,
            row: PhantomData,
        }
    }

    /// Select `reference` (e.g. `"c.name"`) as `as_name`.
    #[must_use]
    pub fn select(self, reference: &str, as_name: &str) -> Self {
        self.select_expr(PhysicalColumn::parse(reference).expr(), as_name)
    }

    #[must_use]
    pub fn select_expr(mut self, expr: impl Into<SimpleExpr>, as_name: &str) -> Self {
        self.columns.push((expr.into(), as_name.to_string()));
        self
    }

    #[must_use]
    pub fn left_join(self, table: &str, alias: &str, on: impl IntoCondition) -> Self {
        self.join(JoinType::LeftJoin, table, alias, on)
    }

    #[must_use]
    pub fn inner_join(self, table: &str, alias: &str, on: impl IntoCondition) -> Self {
        self.join(JoinType::InnerJoin, table, alias, on)
    }

    fn join(mut self, kind: JoinType, table: &str, alias: &str, on: impl IntoCondition) -> Self {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            alias: alias.to_string(),
            on: on.into_condition(),
            scoped: Vec::new(),
        });
        self
    }

    fn base_statement(&self) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.from_as(Alias::new(&self.table), Alias::new(&self.alias));
        for join in &self.joins {
            stmt.join_as(
                join.kind,
                Alias::new(&join.table),
                Alias::new(&join.alias),
                join.condition(),
            );
        }
        if !self.condition.is_empty() {
            stmt.cond_where(self.condition.clone());
        }
        stmt
    }

    /// The statement [`Queryable::fetch`] runs.
    #[must_use]
    pub fn statement(&self) -> SelectStatement {
        let mut stmt = self.base_statement();
        if self.columns.is_empty() {
            stmt.column(Asterisk);
        }
        for (expr, name) in &self.columns {
            stmt.expr_as(expr.clone(), Alias::new(name));
        }
        for (expr, order) in &self.orders {
            stmt.order_by_expr(expr.clone(), order.clone());
        }
        if let Some(limit) = self.limit {
            stmt.limit(limit);
        }
        if let Some(offset) = self.offset {
            stmt.offset(offset);
        }
        stmt
    }

    /// Same joins and filters as [`Self::statement`], selecting only the row count.
    #[must_use]
    pub fn count_statement(&self) -> SelectStatement {
        let mut stmt = self.base_statement();
        stmt.expr_as(Func::count(Expr::col(Asterisk)), Alias::new(COUNT_ALIAS));
        stmt
    }
}

#[async_trait]
impl<R> Queryable for TableQuery<R>
where
    R: FromQueryResult + Send + Sync + 'static,
{
    type Row = R;

    fn filter(&mut self, condition: Condition) {
        self.condition = std::mem::replace(&mut self.condition, Condition::all()).add(condition);
    }

    fn has_scope(&self, scope: &str) -> bool {
        self.joins.iter().any(|join| join.alias == scope)
    }

    fn filter_scope(&mut self, scope: &str, condition: Condition) {
        match self.joins.iter_mut().find(|join| join.alias == scope) {
            Some(join) => join.scoped.push(condition),
            None => self.filter(condition),
        }
    }

    fn order_by(&mut self, expr: SimpleExpr, order: Order) {
        self.orders.push((expr, order));
    }

    fn paginate(&mut self, offset: u64, limit: u64) {
        self.offset = Some(offset);
        self.limit = Some(limit);
    }

    async fn count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        let backend = db.get_database_backend();
        let Some(row) = db.query_one(backend.build(&self.count_statement())).await? else {
            return Ok(0);
        };
        let count: i64 = row.try_get("", COUNT_ALIAS)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn fetch(self, db: &DatabaseConnection) -> Result<Vec<R>, DbErr> {
        let backend = db.get_database_backend();
        R::find_by_statement(backend.build(&self.statement()))
            .all(db)
            .await
    }
}
