use crate::models::{Expense, ExpenseParticipant, Member, NewExpense, ParticipantShare, Trip};
use sqlx::PgPool;

const EXPENSE_COLUMNS: &str =
    "id, trip_id, payer_id, amount, currency, category, description, date, version";

/// Query a trip
pub async fn get_trip(pool: &PgPool, trip_id: i64) -> Result<Option<Trip>, sqlx::Error> {
    sqlx::query_as::<_, Trip>(
        r#"
        SELECT id, name, currency
        FROM trips
        WHERE id = $1
        "#,
    )
    .bind(trip_id)
    .fetch_optional(pool)
    .await
}

/// Trip members in membership order
pub async fn list_members(pool: &PgPool, trip_id: i64) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        r#"
        SELECT trip_id, member_id, name, role, position
        FROM trip_members
        WHERE trip_id = $1
        ORDER BY position, member_id
        "#,
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await
}

pub async fn get_expense(pool: &PgPool, expense_id: i64) -> Result<Option<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!(
        "SELECT {} FROM expenses WHERE id = $1",
        EXPENSE_COLUMNS
    ))
    .bind(expense_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_expenses(pool: &PgPool, trip_id: i64) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!(
        "SELECT {} FROM expenses WHERE trip_id = $1 ORDER BY date, id",
        EXPENSE_COLUMNS
    ))
    .bind(trip_id)
    .fetch_all(pool)
    .await
}

/// Participant rows joined to the trip's expenses
pub async fn list_trip_participants(
    pool: &PgPool,
    trip_id: i64,
) -> Result<Vec<ExpenseParticipant>, sqlx::Error> {
    sqlx::query_as::<_, ExpenseParticipant>(
        r#"
        SELECT ep.expense_id, ep.member_id, ep.amount_owed
        FROM expense_participants ep
        INNER JOIN expenses e ON e.id = ep.expense_id
        WHERE e.trip_id = $1
        ORDER BY ep.expense_id, ep.position
        "#,
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await
}

pub async fn list_participants(
    pool: &PgPool,
    expense_id: i64,
) -> Result<Vec<ExpenseParticipant>, sqlx::Error> {
    sqlx::query_as::<_, ExpenseParticipant>(
        r#"
        SELECT expense_id, member_id, amount_owed
        FROM expense_participants
        WHERE expense_id = $1
        ORDER BY position
        "#,
    )
    .bind(expense_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_expense(
    pool: &PgPool,
    trip_id: i64,
    expense: &NewExpense,
    currency: &str,
) -> Result<Expense, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!(
        r#"
        INSERT INTO expenses (trip_id, payer_id, amount, currency, category, description, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        EXPENSE_COLUMNS
    ))
    .bind(trip_id)
    .bind(expense.payer_id)
    .bind(&expense.amount)
    .bind(currency)
    .bind(expense.category.as_str())
    .bind(&expense.description)
    .bind(expense.date)
    .fetch_one(pool)
    .await
}

/// Replace the participant set of an expense in one transaction.
///
/// The version bump takes the expense row lock, so concurrent replacements
/// of the same expense serialize and the loser sees a stale version.
/// Returns `None` on a version mismatch.
pub async fn replace_participants(
    pool: &PgPool,
    expense_id: i64,
    expected_version: i64,
    shares: &[ParticipantShare],
) -> Result<Option<Expense>, sqlx::Error> {
    let start_time = std::time::Instant::now();
    let mut tx = pool.begin().await?;

    let bumped = sqlx::query_as::<_, Expense>(&format!(
        r#"
        UPDATE expenses
        SET version = version + 1
        WHERE id = $1 AND version = $2
        RETURNING {}
        "#,
        EXPENSE_COLUMNS
    ))
    .bind(expense_id)
    .bind(expected_version)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(expense) = bumped else {
        tx.rollback().await?;
        return Ok(None);
    };

    sqlx::query("DELETE FROM expense_participants WHERE expense_id = $1")
        .bind(expense_id)
        .execute(&mut *tx)
        .await?;

    if !shares.is_empty() {
        let mut query_builder = sqlx::QueryBuilder::new(
            "INSERT INTO expense_participants (expense_id, member_id, amount_owed, position) ",
        );
        query_builder.push_values(shares.iter().enumerate(), |mut b, (idx, share)| {
            b.push_bind(expense_id)
                .push_bind(share.member_id)
                .push_bind(share.amount_owed.clone())
                .push_bind(idx as i32);
        });
        query_builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    tracing::debug!(
        "Expense {}: {} participants written in {:?}",
        expense_id,
        shares.len(),
        start_time.elapsed()
    );

    Ok(Some(expense))
}
