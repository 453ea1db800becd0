//! Testes do motor de pedidos
//!
//! Propriedades cobertas:
//! - Máquina de estados: só Pending->Completed e Completed->Cancelled
//! - Limites de desconto: total x (1 - max/100) <= aceito <= total
//! - Conclusão + cancelamento devolvem o lote à quantidade original
//! - Duas conclusões concorrentes sobre o mesmo lote: exatamente uma
//!   passa, quantidade nunca fica negativa

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pending,
    Completed,
    Cancelled,
}

fn can_transition(from: Status, to: Status) -> bool {
    matches!(
        (from, to),
        (Status::Pending, Status::Completed) | (Status::Completed, Status::Cancelled)
    )
}

fn discount_floor(total: Decimal, max_pct: Decimal) -> Decimal {
    (total * (Decimal::ONE_HUNDRED - max_pct) / Decimal::ONE_HUNDRED).round_dp(2)
}

// Espelho da conclusão de pedido: checa e baixa sob o mesmo "lock".
fn complete_against(stock_qty: &mut i64, needed: i64) -> Result<(), &'static str> {
    if *stock_qty < needed {
        return Err("insufficient stock");
    }
    *stock_qty -= needed;
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn legal_transitions_only() {
        assert!(can_transition(Status::Pending, Status::Completed));
        assert!(can_transition(Status::Completed, Status::Cancelled));

        // diretas e reversas ilegais
        assert!(!can_transition(Status::Pending, Status::Cancelled));
        assert!(!can_transition(Status::Completed, Status::Pending));
        assert!(!can_transition(Status::Cancelled, Status::Pending));
        assert!(!can_transition(Status::Cancelled, Status::Completed));
        // auto-transições
        assert!(!can_transition(Status::Pending, Status::Pending));
        assert!(!can_transition(Status::Completed, Status::Completed));
        assert!(!can_transition(Status::Cancelled, Status::Cancelled));
    }

    #[test]
    fn two_line_order_discount_scenario() {
        // lote A: preço 100, 2 pedidos; lote B: preço 50, 1 pedido
        let total = dec("100") * dec("2") + dec("50") * dec("1");
        assert_eq!(total, dec("250"));

        // max 10% -> mínimo 225; 200 fica abaixo do piso
        let floor = discount_floor(total, dec("10"));
        assert_eq!(floor, dec("225.00"));
        assert!(dec("200") < floor);
    }

    #[test]
    fn concurrent_completion_one_wins() {
        // lote com 5; dois pedidos precisando de 3 cada
        let mut qty = 5i64;
        let first = complete_against(&mut qty, 3);
        let second = complete_against(&mut qty, 3);

        assert!(first.is_ok());
        assert!(second.is_err());
        assert_eq!(qty, 2);
        assert!(qty >= 0);
    }

    #[test]
    fn complete_then_cancel_round_trips() {
        let mut qty = 8i64;
        complete_against(&mut qty, 5).unwrap();
        assert_eq!(qty, 3);
        qty += 5; // cancelamento devolve
        assert_eq!(qty, 8);
    }

    #[test]
    fn failed_completion_leaves_stock_unchanged() {
        let mut qty = 2i64;
        assert!(complete_against(&mut qty, 3).is_err());
        assert_eq!(qty, 2);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    fn money_strategy() -> impl Strategy<Value = Decimal> {
        (100i64..=10_000_000).prop_map(|n| Decimal::new(n, 2)) // 1.00 a 100000.00
    }

    fn pct_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100).prop_map(Decimal::from)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// O piso nunca excede o total e nunca é negativo.
        #[test]
        fn discount_floor_within_range(total in money_strategy(), pct in pct_strategy()) {
            let floor = discount_floor(total, pct);
            prop_assert!(floor >= Decimal::ZERO);
            prop_assert!(floor <= total);
        }

        /// Aceitos são exatamente os valores em [piso, total].
        #[test]
        fn accepted_discounts_match_bounds(
            total in money_strategy(),
            pct in pct_strategy(),
            requested in money_strategy()
        ) {
            let floor = discount_floor(total, pct);
            let accepted = requested >= floor && requested <= total;
            let rejected_low = requested < floor;
            let rejected_high = requested > total;
            // trichotomia: exatamente um caso
            prop_assert_eq!(
                1,
                usize::from(accepted) + usize::from(rejected_low) + usize::from(rejected_high)
            );
        }

        /// Completar e cancelar devolve o lote ao valor original; a
        /// quantidade nunca fica negativa no meio do caminho.
        #[test]
        fn completion_cancellation_round_trip(
            initial in 0i64..=1000,
            needed in 1i64..=1000
        ) {
            let mut qty = initial;
            match complete_against(&mut qty, needed) {
                Ok(()) => {
                    prop_assert!(qty >= 0);
                    qty += needed;
                    prop_assert_eq!(qty, initial);
                }
                Err(_) => prop_assert_eq!(qty, initial),
            }
        }

        /// Série de conclusões concorrentes: as vencedoras consomem no
        /// máximo o saldo inicial e o lote nunca fica negativo.
        #[test]
        fn serialized_completions_never_oversell(
            initial in 0i64..=100,
            requests in prop::collection::vec(1i64..=20, 1..10)
        ) {
            let mut qty = initial;
            let mut granted = 0i64;
            for needed in &requests {
                if complete_against(&mut qty, *needed).is_ok() {
                    granted += needed;
                }
                prop_assert!(qty >= 0);
            }
            prop_assert!(granted <= initial);
            prop_assert_eq!(qty, initial - granted);
        }

        /// Da transição só há dois arcos legais em todo o grafo.
        #[test]
        fn transition_graph_has_two_edges(
            from_idx in 0usize..3,
            to_idx in 0usize..3
        ) {
            let states = [Status::Pending, Status::Completed, Status::Cancelled];
            let from = states[from_idx];
            let to = states[to_idx];
            let legal = (from == Status::Pending && to == Status::Completed)
                || (from == Status::Completed && to == Status::Cancelled);
            prop_assert_eq!(can_transition(from, to), legal);
        }
    }
}
