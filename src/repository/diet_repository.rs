use crate::db::database::{Database, DatabaseTrait};
use crate::model::diet::{
    DailyCalories, DietEntry, DietEntryWrite, DietItemDetail, Food, MealType, NewDietItem,
    NewFood,
};
use crate::repository::placeholders;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySql, QueryBuilder};
use std::sync::Arc;

const FOOD_COLUMNS: &str = "id, name, category, unit, calories, image, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DietRepositoryTrait: Send + Sync {
    async fn find_foods_by_ids(&self, food_ids: &[i64]) -> Result<Vec<Food>, sqlx::Error>;

    /// 按名称排序分页，search 做模糊匹配
    async fn list_foods(
        &self,
        category: Option<String>,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Food>, sqlx::Error>;

    async fn count_foods(
        &self,
        category: Option<String>,
        search: Option<String>,
    ) -> Result<i64, sqlx::Error>;

    /// 按类别、名称排序的全部食物
    async fn all_foods(&self) -> Result<Vec<Food>, sqlx::Error>;

    async fn create_food(&self, new_food: &NewFood, now: DateTime<Utc>)
        -> Result<Food, sqlx::Error>;

    /// 在一个事务里找到或创建 (user, meal, date) 的记录，删除旧的条目，
    /// 写入新的条目和总热量
    async fn replace_diet_entry(
        &self,
        user_id: i64,
        meal_type: MealType,
        entry_date: NaiveDate,
        items: &[NewDietItem],
        total_calories: i64,
        now: DateTime<Utc>,
    ) -> Result<DietEntryWrite, sqlx::Error>;

    async fn list_diet_entries(
        &self,
        user_id: i64,
        entry_date: NaiveDate,
    ) -> Result<Vec<DietEntry>, sqlx::Error>;

    async fn list_diet_items(&self, entry_ids: &[i64]) -> Result<Vec<DietItemDetail>, sqlx::Error>;

    /// [start, end] 内每天的总热量，没有记录的日期不返回
    async fn daily_calories(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCalories>, sqlx::Error>;
}

#[derive(Clone)]
pub struct DietRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl DietRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

fn push_food_filters(
    builder: &mut QueryBuilder<'_, MySql>,
    category: Option<String>,
    search: Option<String>,
) {
    builder.push(" WHERE 1 = 1");
    if let Some(category) = category {
        builder.push(" AND category = ").push_bind(category);
    }
    if let Some(search) = search {
        builder
            .push(" AND name LIKE ")
            .push_bind(format!("%{}%", search));
    }
}

#[async_trait]
impl DietRepositoryTrait for DietRepository {
    async fn find_foods_by_ids(&self, food_ids: &[i64]) -> Result<Vec<Food>, sqlx::Error> {
        if food_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT {FOOD_COLUMNS} FROM foods WHERE id IN ({})",
            placeholders(food_ids.len())
        );
        let mut query = sqlx::query_as::<_, Food>(&sql);
        for food_id in food_ids {
            query = query.bind(*food_id);
        }
        query.fetch_all(self.db_conn.get_master_pool()).await
    }

    async fn list_foods(
        &self,
        category: Option<String>,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Food>, sqlx::Error> {
        let mut builder = QueryBuilder::<MySql>::new(format!("SELECT {FOOD_COLUMNS} FROM foods"));
        push_food_filters(&mut builder, category, search);
        builder
            .push(" ORDER BY name ASC, id ASC LIMIT ")
            .push_bind(offset)
            .push(", ")
            .push_bind(limit);
        builder
            .build_query_as::<Food>()
            .fetch_all(self.db_conn.get_slave_pool())
            .await
    }

    async fn count_foods(
        &self,
        category: Option<String>,
        search: Option<String>,
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM foods");
        push_food_filters(&mut builder, category, search);
        builder
            .build_query_scalar::<i64>()
            .fetch_one(self.db_conn.get_slave_pool())
            .await
    }

    async fn all_foods(&self) -> Result<Vec<Food>, sqlx::Error> {
        let sql = format!("SELECT {FOOD_COLUMNS} FROM foods ORDER BY category, name");
        sqlx::query_as::<_, Food>(&sql)
            .fetch_all(self.db_conn.get_slave_pool())
            .await
    }

    async fn create_food(
        &self,
        new_food: &NewFood,
        now: DateTime<Utc>,
    ) -> Result<Food, sqlx::Error> {
        let sql_ret = sqlx::query(
            "INSERT INTO foods (name, category, unit, calories, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_food.name)
        .bind(&new_food.category)
        .bind(&new_food.unit)
        .bind(new_food.calories)
        .bind(&new_food.image)
        .bind(now)
        .bind(now)
        .execute(self.db_conn.get_master_pool())
        .await?;

        let sql = format!("SELECT {FOOD_COLUMNS} FROM foods WHERE id = ?");
        sqlx::query_as::<_, Food>(&sql)
            .bind(sql_ret.last_insert_id() as i64)
            .fetch_one(self.db_conn.get_master_pool())
            .await
    }

    async fn replace_diet_entry(
        &self,
        user_id: i64,
        meal_type: MealType,
        entry_date: NaiveDate,
        items: &[NewDietItem],
        total_calories: i64,
        now: DateTime<Utc>,
    ) -> Result<DietEntryWrite, sqlx::Error> {
        let mut tx = self.db_conn.get_master_pool().begin().await?;
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM diet_entries WHERE user_id = ? AND meal_type = ? AND entry_date = ? FOR UPDATE",
        )
        .bind(user_id)
        .bind(meal_type.as_str())
        .bind(entry_date)
        .fetch_optional(&mut *tx)
        .await?;

        // LAST_INSERT_ID(id) 让更新分支也能拿到已有记录的 id
        let sql_ret = sqlx::query(
            "INSERT INTO diet_entries (user_id, meal_type, entry_date, total_calories, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY
            UPDATE id = LAST_INSERT_ID(id), total_calories = VALUES(total_calories), updated_at = VALUES(updated_at)",
        )
        .bind(user_id)
        .bind(meal_type.as_str())
        .bind(entry_date)
        .bind(total_calories)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        let entry_id = existing.unwrap_or(sql_ret.last_insert_id() as i64);

        sqlx::query("DELETE FROM diet_items WHERE diet_entry_id = ?")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        if !items.is_empty() {
            let mut builder = QueryBuilder::<MySql>::new(
                "INSERT INTO diet_items (diet_entry_id, food_id, quantity, calories, created_at, updated_at) ",
            );
            builder.push_values(items, |mut row, item| {
                row.push_bind(entry_id)
                    .push_bind(item.food_id)
                    .push_bind(item.quantity)
                    .push_bind(item.calories)
                    .push_bind(now)
                    .push_bind(now);
            });
            builder.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;

        Ok(DietEntryWrite {
            entry_id,
            created: existing.is_none(),
        })
    }

    async fn list_diet_entries(
        &self,
        user_id: i64,
        entry_date: NaiveDate,
    ) -> Result<Vec<DietEntry>, sqlx::Error> {
        sqlx::query_as::<_, DietEntry>(
            "SELECT id, user_id, meal_type, entry_date, total_calories, created_at, updated_at
            FROM diet_entries
            WHERE user_id = ? AND entry_date = ?
            ORDER BY FIELD(meal_type, 'breakfast', 'lunch', 'dinner', 'snack'), id",
        )
        .bind(user_id)
        .bind(entry_date)
        .fetch_all(self.db_conn.get_master_pool())
        .await
    }

    async fn list_diet_items(&self, entry_ids: &[i64]) -> Result<Vec<DietItemDetail>, sqlx::Error> {
        if entry_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT
                i.id,
                i.diet_entry_id,
                i.food_id,
                i.quantity,
                i.calories,
                f.name AS food_name,
                f.category AS food_category,
                f.unit AS food_unit,
                f.calories AS food_calories,
                f.image AS food_image
            FROM diet_items i
            JOIN foods f ON f.id = i.food_id
            WHERE i.diet_entry_id IN ({})
            ORDER BY i.id",
            placeholders(entry_ids.len())
        );
        let mut query = sqlx::query_as::<_, DietItemDetail>(&sql);
        for entry_id in entry_ids {
            query = query.bind(*entry_id);
        }
        query.fetch_all(self.db_conn.get_master_pool()).await
    }

    async fn daily_calories(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCalories>, sqlx::Error> {
        // SUM 在 mysql 里返回 DECIMAL，转回整数
        sqlx::query_as::<_, DailyCalories>(
            "SELECT entry_date, CAST(SUM(total_calories) AS SIGNED) AS total_calories
            FROM diet_entries
            WHERE user_id = ? AND entry_date BETWEEN ? AND ?
            GROUP BY entry_date
            ORDER BY entry_date",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.db_conn.get_master_pool())
        .await
    }
}
