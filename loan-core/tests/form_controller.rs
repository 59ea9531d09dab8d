//! Scenario tests driving the controller through an in-memory form and store.

use std::collections::HashMap;

use async_trait::async_trait;
use loan_core::calculations::monthly_payment;
use loan_core::form::format_amount;
use loan_core::store::MemoryStore;
use loan_core::{
    Field, FormController, FormEvent, FormState, FormStatus, FormView, PreferenceStore, StoreError,
};
use pretty_assertions::assert_eq;

type Controller = FormController<FormState, MemoryStore>;

fn controller_with(store: MemoryStore) -> Controller {
    FormController::new(FormState::default(), store)
}

async fn edit(
    c: &mut Controller,
    field: Field,
    value: &str,
) {
    c.view_mut().set_value(field, value);
    c.handle(FormEvent::Changed(field))
        .await
        .expect("store should not fail");
}

async fn stored(
    c: &Controller,
    field: Field,
) -> Option<String> {
    c.store().get(field.storage_key()).await.unwrap()
}

#[tokio::test]
async fn valid_inputs_show_results_and_persist_raw_values() {
    let mut c = controller_with(MemoryStore::new());

    edit(&mut c, Field::SalesPrice, "$20,000").await;

    let view = c.view();
    assert!(view.results_active());
    assert_eq!(view.down_payment_text(), "$3,000.00");
    assert_eq!(
        view.monthly_payment_text(),
        format_amount(monthly_payment(20000.0, 16.9, 120))
    );
    assert!(!view.has_errors());

    assert_eq!(stored(&c, Field::SalesPrice).await.as_deref(), Some("$20,000"));
    assert_eq!(stored(&c, Field::Apr).await.as_deref(), Some("16.9"));
    assert_eq!(stored(&c, Field::NumPayments).await.as_deref(), Some("120"));
}

#[tokio::test]
async fn twenty_thousand_scenario_monthly_amount() {
    let mut c = controller_with(MemoryStore::new());
    c.view_mut().set_value(Field::SalesPrice, "$20,000");

    let status = c.recompute().await.unwrap();

    let rate: f64 = 16.9 / 100.0 / 12.0;
    let expected = 17000.0 * rate / (1.0 - (1.0 + rate).powf(-120.0)) + 10.0;
    let estimate = status.estimate().expect("results shown");
    assert_eq!(estimate.down_payment, 3000.0);
    assert!((estimate.monthly_payment - expected).abs() < 1e-9);
    assert_eq!(format_amount(estimate.monthly_payment), "$304.38");
}

#[tokio::test]
async fn empty_price_shows_error_and_skips_persistence() {
    let mut c = controller_with(MemoryStore::new());

    let status = c.recompute().await.unwrap();

    assert_eq!(status, FormStatus::ResultsHidden);
    let view = c.view();
    assert_eq!(
        view.error(Field::SalesPrice),
        Some("Please enter a valid sales price.")
    );
    assert_eq!(view.error(Field::Apr), None);
    assert_eq!(view.error(Field::NumPayments), None);
    assert_eq!(view.down_payment_text(), "$0.00");
    assert_eq!(view.monthly_payment_text(), "$0.00");
    assert!(!view.results_active());
    assert!(c.store().snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_sales_prices_hide_results() {
    for raw in ["0", "-5", "abc", ""] {
        let mut c = controller_with(MemoryStore::new());
        edit(&mut c, Field::SalesPrice, "1000").await;
        assert!(c.view().results_active());

        edit(&mut c, Field::SalesPrice, raw).await;

        assert_eq!(
            c.view().error(Field::SalesPrice),
            Some("Please enter a valid sales price."),
            "input {raw:?}"
        );
        assert!(!c.view().results_active(), "input {raw:?}");
        assert_eq!(c.view().down_payment_text(), "$0.00");
        // The last valid values stay stored.
        assert_eq!(stored(&c, Field::SalesPrice).await.as_deref(), Some("1000"));
    }
}

#[tokio::test]
async fn invalid_selector_values_raise_their_own_errors() {
    let cases = [
        (Field::Apr, "Please enter a valid APR."),
        (Field::NumPayments, "Please enter a valid number of payments."),
    ];
    for (field, message) in cases {
        for raw in ["0", "-5", "abc", ""] {
            let form = FormState::new(
                vec!["16.9".into(), "0".into(), "-5".into(), "abc".into()],
                vec!["120".into(), "0".into(), "-5".into(), "abc".into()],
                &Default::default(),
            );
            let mut c = FormController::new(form, MemoryStore::new());
            c.view_mut().set_value(Field::SalesPrice, "1000");

            edit(&mut c, field, raw).await;

            assert_eq!(c.view().error(field), Some(message), "{field:?} {raw:?}");
            assert_eq!(c.view().error(Field::SalesPrice), None);
            assert!(!c.view().results_active());
            assert!(c.store().snapshot().unwrap().is_empty());
        }
    }
}

#[tokio::test]
async fn every_invalid_field_reports_at_once() {
    let mut c = controller_with(MemoryStore::new());
    c.view_mut().set_value(Field::Apr, "not an option");
    c.view_mut().set_value(Field::NumPayments, "not an option");

    c.recompute().await.unwrap();

    for field in Field::ALL {
        assert!(c.view().error(field).is_some(), "{field:?}");
    }
}

#[tokio::test]
async fn fixing_a_field_clears_its_error() {
    let mut c = controller_with(MemoryStore::new());
    edit(&mut c, Field::SalesPrice, "abc").await;
    assert!(c.view().error(Field::SalesPrice).is_some());

    edit(&mut c, Field::SalesPrice, "2500").await;

    assert_eq!(c.view().error(Field::SalesPrice), None);
    assert!(c.view().results_active());
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let mut c = controller_with(MemoryStore::new());
    c.view_mut().set_value(Field::SalesPrice, "$18,750.25");
    c.view_mut().set_value(Field::Apr, "9.9");
    c.view_mut().set_value(Field::NumPayments, "60");

    let first = c.recompute().await.unwrap();
    let view_after_first = c.view().clone();
    let store_after_first = c.store().snapshot().unwrap();

    let second = c.recompute().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(c.view(), &view_after_first);
    assert_eq!(c.store().snapshot().unwrap(), store_after_first);
}

#[tokio::test]
async fn clear_resets_form_and_forgets_values() {
    let mut c = controller_with(MemoryStore::new());
    edit(&mut c, Field::Apr, "24.9").await;
    edit(&mut c, Field::NumPayments, "36").await;
    edit(&mut c, Field::SalesPrice, "$9,999").await;
    assert!(c.view().results_active());

    c.handle(FormEvent::Cleared).await.unwrap();

    let view = c.view();
    assert_eq!(view.value(Field::SalesPrice), "");
    assert_eq!(view.value(Field::Apr), "16.9");
    assert_eq!(view.value(Field::NumPayments), "120");
    assert!(!view.has_errors());
    assert!(!view.results_active());
    assert_eq!(view.down_payment_text(), "$0.00");
    assert_eq!(view.monthly_payment_text(), "$0.00");
    assert!(c.store().snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn clear_does_not_recompute() {
    let mut c = controller_with(MemoryStore::new());
    edit(&mut c, Field::SalesPrice, "abc").await;

    c.reset().await.unwrap();

    // A recompute would have flagged the now-empty price.
    assert_eq!(c.view().error(Field::SalesPrice), None);
}

#[tokio::test]
async fn restore_with_empty_store_keeps_defaults() {
    let mut c = controller_with(MemoryStore::new());
    c.reset().await.unwrap();

    let status = c.restore_and_init().await.unwrap();

    assert_eq!(status, FormStatus::ResultsHidden);
    assert_eq!(c.view().value(Field::Apr), "16.9");
    assert_eq!(c.view().value(Field::NumPayments), "120");
    assert!(c.view().error(Field::SalesPrice).is_some());
}

#[tokio::test]
async fn restore_applies_stored_values_and_shows_results() {
    let store = MemoryStore::with_entries([
        ("salesPrice", "$12,000.00"),
        ("apr", "12.9"),
        ("numPayments", "48"),
    ]);
    let mut c = controller_with(store);

    let status = c.restore_and_init().await.unwrap();

    assert!(status.is_shown());
    assert_eq!(c.view().value(Field::SalesPrice), "$12,000.00");
    assert_eq!(c.view().value(Field::Apr), "12.9");
    assert_eq!(c.view().value(Field::NumPayments), "48");
    assert_eq!(c.view().down_payment_text(), "$1,800.00");
}

#[tokio::test]
async fn restore_skips_empty_stored_values() {
    let store = MemoryStore::with_entries([("salesPrice", "5000"), ("apr", "")]);
    let mut c = controller_with(store);

    c.restore_and_init().await.unwrap();

    assert_eq!(c.view().value(Field::Apr), "16.9");
    assert!(c.view().results_active());
}

#[tokio::test]
async fn restore_of_unknown_option_surfaces_error() {
    let store = MemoryStore::with_entries([("salesPrice", "5000"), ("numPayments", "7")]);
    let mut c = controller_with(store);

    let status = c.restore_and_init().await.unwrap();

    assert_eq!(status, FormStatus::ResultsHidden);
    assert_eq!(
        c.view().error(Field::NumPayments),
        Some("Please enter a valid number of payments.")
    );
}

#[tokio::test]
async fn fractional_payment_count_is_accepted_as_integer_prefix() {
    let form = FormState::new(
        vec!["16.9".into()],
        vec!["12.5".into()],
        &loan_core::form::FormDefaults {
            apr: "16.9".into(),
            num_payments: "12.5".into(),
        },
    );
    let mut c = FormController::new(form, MemoryStore::new());
    c.view_mut().set_value(Field::SalesPrice, "1000");

    let status = c.recompute().await.unwrap();

    let estimate = status.estimate().expect("results shown");
    assert_eq!(estimate.monthly_payment, monthly_payment(1000.0, 16.9, 12));
    assert_eq!(stored(&c, Field::NumPayments).await.as_deref(), Some("12.5"));
}

// =========================================================================
// Store failures
// =========================================================================

/// Memory store that rejects every operation touching `broken_key`.
struct BrokenKeyStore {
    inner: MemoryStore,
    broken_key: &'static str,
}

impl BrokenKeyStore {
    fn new(
        broken_key: &'static str,
        entries: &[(&str, &str)],
    ) -> Self {
        Self {
            inner: MemoryStore::with_entries(entries.iter().copied()),
            broken_key,
        }
    }

    fn check(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        if key == self.broken_key {
            Err(StoreError::Backend("disk full".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PreferenceStore for BrokenKeyStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.check(key)?;
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn set_all(
        &self,
        entries: &[(&str, &str)],
    ) -> Result<(), StoreError> {
        for (key, _) in entries {
            self.check(key)?;
        }
        self.inner.set_all(entries).await
    }

    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.delete(key).await
    }
}

fn previous_session() -> HashMap<String, String> {
    HashMap::from([
        ("salesPrice".to_string(), "1000".to_string()),
        ("apr".to_string(), "9.9".to_string()),
        ("numPayments".to_string(), "12".to_string()),
    ])
}

#[tokio::test]
async fn failed_save_keeps_previous_session_and_hides_results() {
    let store = BrokenKeyStore::new(
        "apr",
        &[("salesPrice", "1000"), ("apr", "9.9"), ("numPayments", "12")],
    );
    let mut c = FormController::new(FormState::default(), store);
    c.view_mut().set_value(Field::SalesPrice, "5000");

    let result = c.handle(FormEvent::Changed(Field::SalesPrice)).await;

    assert_eq!(result, Err(StoreError::Backend("disk full".to_string())));
    assert!(!c.view().results_active());
    assert_eq!(c.view().down_payment_text(), "$0.00");
    assert_eq!(c.view().monthly_payment_text(), "$0.00");
    assert_eq!(c.store().inner.snapshot().unwrap(), previous_session());
}

#[tokio::test]
async fn save_succeeds_again_once_store_recovers() {
    let store = BrokenKeyStore::new("apr", &[]);
    let mut c = FormController::new(FormState::default(), store);
    c.view_mut().set_value(Field::SalesPrice, "5000");
    assert!(c.recompute().await.is_err());

    let (view, store) = c.into_parts();
    let mut c = FormController::new(view, store.inner);
    let status = c.recompute().await.unwrap();

    assert!(status.is_shown());
    assert!(c.view().results_active());
    assert_eq!(stored(&c, Field::Apr).await.as_deref(), Some("16.9"));
}

#[tokio::test]
async fn failed_delete_is_returned_after_form_reset() {
    let store = BrokenKeyStore::new("numPayments", &[("salesPrice", "1000")]);
    let mut c = FormController::new(FormState::default(), store);
    c.view_mut().set_value(Field::SalesPrice, "1000");
    c.view_mut().set_value(Field::Apr, "24.9");

    let result = c.handle(FormEvent::Cleared).await;

    assert_eq!(result, Err(StoreError::Backend("disk full".to_string())));
    assert_eq!(c.view().value(Field::SalesPrice), "");
    assert_eq!(c.view().value(Field::Apr), "16.9");
    assert!(!c.view().results_active());
}

#[tokio::test]
async fn failed_restore_is_returned() {
    let store = BrokenKeyStore::new(
        "apr",
        &[("salesPrice", "1000"), ("apr", "9.9"), ("numPayments", "12")],
    );
    let mut c = FormController::new(FormState::default(), store);

    let result = c.restore_and_init().await;

    assert_eq!(result, Err(StoreError::Backend("disk full".to_string())));
    assert!(!c.view().results_active());
}
