//! Orchestrates input, validation, calculation, display and persistence.
//!
//! The host owns the event loop. It applies user edits to the view and then
//! calls [`FormController::handle`] with the matching [`FormEvent`]; every
//! call runs to completion before the next event is read.

use tracing::debug;

use crate::calculations::estimate;
use crate::form::amount::{format_amount, parse_amount, parse_count, parse_rate};
use crate::form::validation::validate_field;
use crate::form::view::{FormDefaults, FormView};
use crate::models::{Field, FormStatus};
use crate::store::{PreferenceStore, StoreError};

/// Something that happened on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// The field's content changed (keystroke or new selection).
    Changed(Field),
    /// The field's content was committed (the field lost focus).
    Committed(Field),
    /// The clear button was pressed.
    Cleared,
}

pub struct FormController<V, S> {
    view: V,
    store: S,
    defaults: FormDefaults,
}

impl<V, S> FormController<V, S>
where
    V: FormView,
    S: PreferenceStore,
{
    pub fn new(
        view: V,
        store: S,
    ) -> Self {
        Self::with_defaults(view, store, FormDefaults::default())
    }

    pub fn with_defaults(
        view: V,
        store: S,
        defaults: FormDefaults,
    ) -> Self {
        Self {
            view,
            store,
            defaults,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access for the host to apply user edits before raising events.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (V, S) {
        (self.view, self.store)
    }

    /// Single entry point for form events.
    pub async fn handle(
        &mut self,
        event: FormEvent,
    ) -> Result<(), StoreError> {
        match event {
            FormEvent::Changed(_) => {
                self.recompute().await?;
            }
            FormEvent::Committed(Field::SalesPrice) => self.commit_sales_price(),
            FormEvent::Committed(_) => {}
            FormEvent::Cleared => self.reset().await?,
        }
        Ok(())
    }

    /// Re-reads all three fields and refreshes the results.
    ///
    /// Every field is validated, so each error slot reflects its own field
    /// even when another one already failed. Nothing is written to the store
    /// unless all three are valid. If saving fails the results stay hidden
    /// and the error is returned.
    pub async fn recompute(&mut self) -> Result<FormStatus, StoreError> {
        let raw_price = self.view.value(Field::SalesPrice);
        let raw_apr = self.view.value(Field::Apr);
        let raw_count = self.view.value(Field::NumPayments);

        let price = self.check(Field::SalesPrice, parse_amount(&raw_price));
        let apr = self.check(Field::Apr, parse_rate(&raw_apr));
        let count = self.check(
            Field::NumPayments,
            parse_count(&raw_count).map(|n| n as f64),
        );

        let (Some(price), Some(apr), Some(count)) = (price, apr, count) else {
            debug!("inputs incomplete; hiding results");
            self.show_zeroed();
            return Ok(FormStatus::ResultsHidden);
        };

        // Validated counts are positive integers; anything past u32 is
        // indistinguishable from an infinite term.
        let num_payments = u32::try_from(count as i64).unwrap_or(u32::MAX);
        let result = estimate(price, apr, num_payments);

        // All three values are saved or none are; results show only after.
        let saved = self
            .store
            .set_all(&[
                (Field::SalesPrice.storage_key(), raw_price.as_str()),
                (Field::Apr.storage_key(), raw_apr.as_str()),
                (Field::NumPayments.storage_key(), raw_count.as_str()),
            ])
            .await;
        if let Err(e) = saved {
            self.show_zeroed();
            return Err(e);
        }

        self.view.set_down_payment(&format_amount(result.down_payment));
        self.view
            .set_monthly_payment(&format_amount(result.monthly_payment));
        self.view.set_results_active(true);

        debug!(
            down_payment = result.down_payment,
            monthly_payment = result.monthly_payment,
            "results updated"
        );
        Ok(FormStatus::ResultsShown(result))
    }

    /// Empties the price, restores the selector defaults, clears every error
    /// slot, hides the results and forgets the stored values.
    pub async fn reset(&mut self) -> Result<(), StoreError> {
        self.view.set_value(Field::SalesPrice, "");
        self.view.set_value(Field::Apr, &self.defaults.apr);
        self.view
            .set_value(Field::NumPayments, &self.defaults.num_payments);
        for field in Field::ALL {
            self.view.set_error(field, None);
        }
        self.show_zeroed();

        for field in Field::ALL {
            self.store.delete(field.storage_key()).await?;
        }
        debug!("form cleared");
        Ok(())
    }

    /// Copies every non-empty stored value into its field, then recomputes.
    pub async fn restore_and_init(&mut self) -> Result<FormStatus, StoreError> {
        for field in Field::ALL {
            if let Some(value) = self
                .store
                .get(field.storage_key())
                .await?
                .filter(|v| !v.is_empty())
            {
                debug!(key = field.storage_key(), %value, "restoring stored value");
                self.view.set_value(field, &value);
            }
        }
        self.recompute().await
    }

    /// Rewrites the sales price as formatted currency, or empties it when it
    /// does not parse to a non-zero amount. Does not recompute.
    pub fn commit_sales_price(&mut self) {
        let formatted = match parse_amount(&self.view.value(Field::SalesPrice)) {
            Some(value) if value != 0.0 => format_amount(value),
            _ => String::new(),
        };
        self.view.set_value(Field::SalesPrice, &formatted);
    }

    fn check(
        &mut self,
        field: Field,
        value: Option<f64>,
    ) -> Option<f64> {
        match validate_field(value, field) {
            Ok(v) => {
                self.view.set_error(field, None);
                Some(v)
            }
            Err(e) => {
                self.view.set_error(field, Some(&e.to_string()));
                None
            }
        }
    }

    fn show_zeroed(&mut self) {
        let zero = format_amount(0.0);
        self.view.set_down_payment(&zero);
        self.view.set_monthly_payment(&zero);
        self.view.set_results_active(false);
    }
}
