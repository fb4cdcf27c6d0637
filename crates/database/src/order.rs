//! Order persistence.

use sqlx::SqlitePool;

use crate::models::{NewOrder, Order};
use crate::validation::{validate_amount, validate_quantity};
use crate::{DatabaseError, Result};

const SELECT_ORDERS: &str = r#"
    SELECT
        o.id,
        o.contact_id,
        COALESCE(c.name, '') AS contact_name,
        COALESCE(o.order_date, '') AS order_date,
        COALESCE(o.product, '') AS product,
        o.qty,
        o.amount,
        COALESCE(o.notes, '') AS notes,
        COALESCE(o.proof_of_payment, '') AS proof_of_payment,
        COALESCE(o.status, 'Pending') AS status,
        COALESCE(o.created_at, '') AS created_at
    FROM orders o
    LEFT JOIN contacts c ON c.id = o.contact_id
"#;

/// Insert an order and return its ID.
///
/// Fails with `NotFound` when the order names a contact that does not exist.
pub async fn insert_order(pool: &SqlitePool, order: &NewOrder) -> Result<i64> {
    validate_quantity(order.qty)?;
    validate_amount(order.amount)?;

    if let Some(contact_id) = order.contact_id {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM contacts WHERE id = ?)
            "#,
        )
        .bind(contact_id)
        .fetch_one(pool)
        .await?;
        if !exists {
            return Err(DatabaseError::NotFound {
                entity: "Contact",
                id: contact_id.to_string(),
            });
        }
    }

    let result = sqlx::query(
        r#"
        INSERT INTO orders (contact_id, order_date, product, qty, amount, notes, proof_of_payment, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
        "#,
    )
    .bind(order.contact_id)
    .bind(&order.order_date)
    .bind(&order.product)
    .bind(order.qty)
    .bind(order.amount)
    .bind(&order.notes)
    .bind(&order.proof_of_payment)
    .bind(order.status.as_str())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List all orders, most recent order date first.
pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<Order>> {
    let query = format!("{} ORDER BY o.order_date DESC, o.id DESC", SELECT_ORDERS);
    let orders = sqlx::query_as::<_, Order>(&query).fetch_all(pool).await?;

    Ok(orders)
}

/// List the orders of one contact, most recent order date first.
pub async fn list_orders_for_contact(pool: &SqlitePool, contact_id: i64) -> Result<Vec<Order>> {
    let query = format!(
        "{} WHERE o.contact_id = ? ORDER BY o.order_date DESC, o.id DESC",
        SELECT_ORDERS
    );
    let orders = sqlx::query_as::<_, Order>(&query)
        .bind(contact_id)
        .fetch_all(pool)
        .await?;

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::create_contact;
    use crate::field::ContactField;
    use crate::normalize::FieldMap;
    use crate::status::OrderStatus;
    use crate::{Database, ValidationError};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.ensure_schema().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_and_list_orders() {
        let db = test_db().await;
        let jane = create_contact(db.pool(), &FieldMap::new().with(ContactField::Name, "Jane"))
            .await
            .unwrap();

        insert_order(
            db.pool(),
            &NewOrder {
                contact_id: Some(jane),
                order_date: "2024-03-01".to_string(),
                product: "Luna".to_string(),
                qty: 2,
                amount: 450.0,
                ..NewOrder::default()
            },
        )
        .await
        .unwrap();
        insert_order(
            db.pool(),
            &NewOrder {
                contact_id: Some(jane),
                order_date: "2024-04-15".to_string(),
                product: "GRW".to_string(),
                status: OrderStatus::Paid,
                proof_of_payment: "eft-0415.pdf".to_string(),
                ..NewOrder::default()
            },
        )
        .await
        .unwrap();

        let orders = list_orders(db.pool()).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].product, "GRW");
        assert_eq!(orders[0].status, "Paid");
        assert_eq!(orders[0].qty, 1);
        assert_eq!(orders[0].contact_name, "Jane");
        assert_eq!(orders[1].amount, 450.0);
        assert_eq!(orders[1].status, "Pending");

        let for_jane = list_orders_for_contact(db.pool(), jane).await.unwrap();
        assert_eq!(for_jane.len(), 2);
        assert!(list_orders_for_contact(db.pool(), jane + 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rejects_invalid_quantity_and_amount() {
        let db = test_db().await;

        let result = insert_order(
            db.pool(),
            &NewOrder {
                qty: 0,
                ..NewOrder::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let result = insert_order(
            db.pool(),
            &NewOrder {
                amount: -5.0,
                ..NewOrder::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::InvalidAmount(_)))
        ));

        assert!(list_orders(db.pool()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_for_missing_contact_is_not_found() {
        let db = test_db().await;

        let result = insert_order(
            db.pool(),
            &NewOrder {
                contact_id: Some(404),
                product: "Luna".to_string(),
                ..NewOrder::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "Contact", ref id }) if id == "404"
        ));
        assert!(list_orders(db.pool()).await.unwrap().is_empty());

        // Orders need not name a contact.
        insert_order(db.pool(), &NewOrder::default()).await.unwrap();
        assert_eq!(list_orders(db.pool()).await.unwrap().len(), 1);
    }
}
