// src/services/order_service.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OrderRepository,
    models::{
        auth::User,
        order::{CreateOrderPayload, Order, OrderDetail, OrderStatus},
    },
};

// Política configurável do motor de pedidos (via variáveis de ambiente).
#[derive(Debug, Clone)]
pub struct OrderPolicy {
    pub max_discount_percent: Decimal,
    pub only_superuser_cancel_order: bool,
}

/// Menor total aceitável após desconto, dado o teto percentual.
pub fn discount_floor(total_amount: Decimal, max_discount_percent: Decimal) -> Decimal {
    let factor = (Decimal::ONE_HUNDRED - max_discount_percent) / Decimal::ONE_HUNDRED;
    (total_amount * factor).round_dp(2)
}

/// Valida (ou assume) o total com desconto contra os limites
/// [total x (1 - max/100), total].
pub fn resolve_total_after_disc(
    total_amount: Decimal,
    requested: Option<Decimal>,
    max_discount_percent: Decimal,
) -> Result<Decimal, AppError> {
    let Some(requested) = requested else {
        return Ok(total_amount);
    };
    if requested > total_amount {
        return Err(AppError::field(
            "totalAfterDisc",
            format!(
                "Total after discount cannot be greater than {}.",
                total_amount.normalize()
            ),
        ));
    }
    let floor = discount_floor(total_amount, max_discount_percent);
    if requested < floor {
        return Err(AppError::field(
            "totalAfterDisc",
            format!("Total after discount cannot be less than {}.", floor.normalize()),
        ));
    }
    Ok(requested)
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    policy: OrderPolicy,
    pool: PgPool,
}

impl OrderService {
    pub fn new(order_repo: OrderRepository, policy: OrderPolicy, pool: PgPool) -> Self {
        Self {
            order_repo,
            policy,
            pool,
        }
    }

    // --- Criação ---
    // Uma transação: checa disponibilidade, valida desconto, grava pedido
    // e linhas. As quantidades NÃO são decrementadas aqui; a reserva é
    // implícita pelo status Pending e efetivada na conclusão.
    pub async fn create_order(
        &self,
        payload: &CreateOrderPayload,
        created_by: Uuid,
    ) -> Result<OrderDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut stock_ids: Vec<Uuid> = payload.lines.iter().map(|l| l.stock_id).collect();
        stock_ids.sort();
        stock_ids.dedup();

        let stocks = self.order_repo.stocks_for_lines(&mut *tx, &stock_ids).await?;
        let by_id: HashMap<Uuid, _> = stocks.iter().map(|s| (s.id, s)).collect();

        // Soma pedida por lote: o mesmo lote pode aparecer em mais de uma
        // linha e a checagem vale para o agregado.
        let mut requested: HashMap<Uuid, i64> = HashMap::new();
        for line in &payload.lines {
            *requested.entry(line.stock_id).or_insert(0) += i64::from(line.quantity);
        }

        let mut total_amount = Decimal::ZERO;
        for line in &payload.lines {
            let stock = by_id
                .get(&line.stock_id)
                .ok_or(AppError::NotFound { entity: "Stock" })?;
            let wanted = requested.get(&stock.id).copied().unwrap_or(0);
            if stock.qty == 0 || wanted > i64::from(stock.qty) {
                return Err(AppError::field(
                    "lines",
                    format!("Insufficient stock for product '{}'.", stock.product_name),
                ));
            }
            total_amount += Decimal::from(line.quantity) * stock.sale_price;
        }

        let total_after_disc = resolve_total_after_disc(
            total_amount,
            payload.total_after_disc,
            self.policy.max_discount_percent,
        )?;

        let order = self
            .order_repo
            .insert_order(
                &mut *tx,
                payload.customer_id,
                total_amount,
                total_after_disc,
                created_by,
            )
            .await?;

        for line in &payload.lines {
            self.order_repo
                .insert_line(&mut *tx, order.id, line.stock_id, line.quantity)
                .await?;
        }

        let lines = self.order_repo.lines(&mut *tx, order.id).await?;
        tx.commit().await?;

        tracing::info!("Pedido {} criado com {} linha(s)", order.id, lines.len());
        Ok(OrderDetail { order, lines })
    }

    // --- Transição de status ---
    // Pending -> Completed baixa os lotes; Completed -> Cancelled devolve.
    // O pedido e os lotes ficam travados até o commit: duas conclusões
    // concorrentes sobre o mesmo lote serializam, e a perdedora falha com
    // conflito em vez de deixar quantidade negativa.
    pub async fn transition(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        actor: &User,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound { entity: "Order" })?;

        if !order.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition {
                from: order.status.to_string(),
                to: new_status.to_string(),
            });
        }

        if new_status == OrderStatus::Completed {
            let lines = self.order_repo.lock_lines(&mut *tx, order_id).await?;
            // Recheca com o lote travado: outro pedido pode ter consumido
            // o saldo desde a criação.
            for line in &lines {
                if line.qty < line.quantity {
                    return Err(AppError::Conflict(format!(
                        "Insufficient stock for product '{}' to complete the order.",
                        line.product_name
                    )));
                }
            }
            for line in &lines {
                self.order_repo
                    .adjust_stock_qty(&mut *tx, line.stock_id, -line.quantity)
                    .await?;
            }
        } else {
            if self.policy.only_superuser_cancel_order && !actor.is_superuser {
                return Err(AppError::Forbidden(
                    "Only a superuser can cancel the order.".to_string(),
                ));
            }
            let lines = self.order_repo.lock_lines(&mut *tx, order_id).await?;
            for line in &lines {
                self.order_repo
                    .adjust_stock_qty(&mut *tx, line.stock_id, line.quantity)
                    .await?;
            }
        }

        let updated = self.order_repo.set_status(&mut *tx, order_id, new_status).await?;
        tx.commit().await?;

        tracing::info!(
            "Pedido {} mudou de {} para {}",
            order_id,
            order.status,
            new_status
        );
        Ok(updated)
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self
            .order_repo
            .find(order_id)
            .await?
            .ok_or(AppError::NotFound { entity: "Order" })?;
        let lines = self.order_repo.lines(&self.pool, order_id).await?;
        Ok(OrderDetail { order, lines })
    }

    pub async fn list_orders(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Order>, i64), AppError> {
        self.order_repo.list(limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn floor_follows_max_discount() {
        assert_eq!(discount_floor(dec("250"), dec("10")), dec("225.00"));
        assert_eq!(discount_floor(dec("100"), dec("0")), dec("100.00"));
        assert_eq!(discount_floor(dec("99.99"), dec("25")), dec("74.99"));
    }

    #[test]
    fn omitted_discount_defaults_to_total() {
        let total = dec("250");
        assert_eq!(resolve_total_after_disc(total, None, dec("10")).unwrap(), total);
    }

    #[test]
    fn discount_below_floor_is_rejected_naming_the_bound() {
        // total 250, max 10% -> mínimo permitido 225
        let err = resolve_total_after_disc(dec("250"), Some(dec("200")), dec("10")).unwrap_err();
        match err {
            AppError::FieldValidation { field, message } => {
                assert_eq!(field, "totalAfterDisc");
                assert!(message.contains("cannot be less than 225"), "{message}");
            }
            other => panic!("esperava FieldValidation, veio {other:?}"),
        }
    }

    #[test]
    fn discount_above_total_is_rejected() {
        let err = resolve_total_after_disc(dec("250"), Some(dec("260")), dec("10")).unwrap_err();
        match err {
            AppError::FieldValidation { message, .. } => {
                assert!(message.contains("cannot be greater than 250"), "{message}");
            }
            other => panic!("esperava FieldValidation, veio {other:?}"),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(
            resolve_total_after_disc(dec("250"), Some(dec("225")), dec("10")).unwrap(),
            dec("225")
        );
        assert_eq!(
            resolve_total_after_disc(dec("250"), Some(dec("250")), dec("10")).unwrap(),
            dec("250")
        );
    }
}
