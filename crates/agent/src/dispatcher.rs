//! Generic action dispatcher.
//!
//! One [`ActionDispatcher`] serves one domain. It resolves the requested
//! function against the domain's [`ActionTable`], validates and types the
//! parameters, performs at most one store call and always answers with a
//! [`ResponseEnvelope`]. Routing, validation and store failures all end up as
//! text in the envelope body; `dispatch` itself cannot fail.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use concierge_core::{
    ActionTable, AttributeValue, FieldSpec, FieldType, GeneratedValue, Invocation, OperationKind,
    OperationSpec, Record, RecordId, ResponseEnvelope, ValidationError,
};
use concierge_db::RecordStore;

use crate::clock::{Clock, SystemClock};

/// A validated request, ready for exactly one store call.
#[derive(Clone, Debug, PartialEq, Eq)]
enum StoreRequest {
    Get(RecordId),
    Create(Record),
    Delete(RecordId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Found,
    NotFound,
    Created,
    Deleted,
    NotDeleted,
    StoreFault,
    Rejected(&'static str),
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Created => "created",
            Self::Deleted => "deleted",
            Self::NotDeleted => "not_deleted",
            Self::StoreFault => "store_fault",
            Self::Rejected(kind) => kind,
        }
    }
}

pub struct ActionDispatcher {
    table: ActionTable,
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl ActionDispatcher {
    pub fn new(table: ActionTable, store: Arc<dyn RecordStore>) -> Self {
        Self { table, store, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    pub async fn dispatch(&self, invocation: &Invocation) -> ResponseEnvelope {
        let (body, outcome) = match self.prepare(invocation) {
            Ok(request) => self.execute(request).await,
            Err(error) => (error.to_string(), Outcome::Rejected(error.kind())),
        };

        info!(
            event_name = "dispatch.completed",
            domain = %self.table.domain,
            action_group = %invocation.action_group,
            function = %invocation.function,
            outcome = outcome.as_str(),
            "action invocation handled"
        );

        ResponseEnvelope::text(invocation, body)
    }

    fn prepare(&self, invocation: &Invocation) -> Result<StoreRequest, ValidationError> {
        let operation = self.table.operation(&invocation.function).ok_or_else(|| {
            ValidationError::UnknownFunction { function: invocation.function.clone() }
        })?;

        match operation.kind {
            OperationKind::Get => self.record_key(invocation).map(StoreRequest::Get),
            OperationKind::Delete => self.record_key(invocation).map(StoreRequest::Delete),
            OperationKind::Create => self.build_record(operation, invocation).map(StoreRequest::Create),
        }
    }

    fn record_key(&self, invocation: &Invocation) -> Result<RecordId, ValidationError> {
        let field = self.table.key_attribute;
        supplied(invocation, field)
            .map(|value| RecordId(value.to_string()))
            .ok_or(ValidationError::MissingParameter { field })
    }

    fn build_record(
        &self,
        operation: &OperationSpec,
        invocation: &Invocation,
    ) -> Result<Record, ValidationError> {
        let missing: Vec<&'static str> = operation
            .required_fields()
            .filter(|field| supplied(invocation, field.name).is_none())
            .map(|field| field.name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingParameters { fields: missing });
        }

        let mut record = Record::new(RecordId::generate());
        for field in &operation.fields {
            if let Some(raw) = supplied(invocation, field.name) {
                record.attributes.insert(field.name.to_string(), typed_value(field, raw)?);
            }
        }

        for generated in &operation.generated {
            let value = match generated.value {
                GeneratedValue::CurrentDate { format } => {
                    self.clock.today().format(format).to_string()
                }
            };
            record.attributes.insert(generated.name.to_string(), AttributeValue::Text(value));
        }

        Ok(record)
    }

    async fn execute(&self, request: StoreRequest) -> (String, Outcome) {
        let label = capitalized(self.table.record_label);
        let (payload, outcome) = match request {
            StoreRequest::Get(id) => match self.store.get(&id).await {
                Ok(Some(record)) => {
                    (Value::Object(record.to_item(self.table.key_attribute)), Outcome::Found)
                }
                Ok(None) => (
                    json!({"message": format!("No {} found with ID {id}", self.table.record_label)}),
                    Outcome::NotFound,
                ),
                Err(error) => self.store_fault("get", &id, error),
            },
            StoreRequest::Create(record) => {
                let id = record.id.clone();
                match self.store.put(record).await {
                    Ok(()) => (json!({ self.table.key_attribute: id.0 }), Outcome::Created),
                    Err(error) => self.store_fault("put", &id, error),
                }
            }
            StoreRequest::Delete(id) => match self.store.delete(&id).await {
                Ok(true) => (
                    json!({"message": format!("{label} with ID {id} deleted successfully")}),
                    Outcome::Deleted,
                ),
                Ok(false) => (
                    json!({
                        "message": format!("Failed to delete {} with ID {id}", self.table.record_label)
                    }),
                    Outcome::NotDeleted,
                ),
                Err(error) => self.store_fault("delete", &id, error),
            },
        };

        (payload.to_string(), outcome)
    }

    fn store_fault(
        &self,
        operation: &'static str,
        id: &RecordId,
        error: concierge_db::StoreError,
    ) -> (Value, Outcome) {
        warn!(
            event_name = "dispatch.store_fault",
            domain = %self.table.domain,
            store_operation = operation,
            record_id = %id,
            error = %error,
            "record store call failed"
        );
        (json!({"error": error.to_string()}), Outcome::StoreFault)
    }
}

/// A parameter counts as supplied only when it is present and not blank.
fn supplied<'a>(invocation: &'a Invocation, name: &str) -> Option<&'a str> {
    invocation.named_parameter(name).filter(|value| !value.trim().is_empty())
}

fn typed_value(field: &FieldSpec, raw: &str) -> Result<AttributeValue, ValidationError> {
    match field.field_type {
        FieldType::String => Ok(AttributeValue::Text(raw.to_string())),
        FieldType::Integer => raw.trim().parse::<i64>().map(AttributeValue::Integer).map_err(|_| {
            ValidationError::InvalidInteger { field: field.name, value: raw.to_string() }
        }),
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use concierge_core::{Domain, Invocation, Record, RecordId, ResponseEnvelope};
    use concierge_db::{InMemoryRecordStore, RecordStore, StoreError};

    use super::ActionDispatcher;
    use crate::clock::FixedClock;

    /// Wraps the in-memory store and counts every call that reaches it.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryRecordStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(id).await
        }

        async fn put(&self, record: Record) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.put(record).await
        }

        async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }
    }

    /// Every call fails as if the backing service were unreachable.
    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn get(&self, _id: &RecordId) -> Result<Option<Record>, StoreError> {
            Err(StoreError::Unavailable("connection reset by peer".to_string()))
        }

        async fn put(&self, _record: Record) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection reset by peer".to_string()))
        }

        async fn delete(&self, _id: &RecordId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection reset by peer".to_string()))
        }
    }

    /// Accepts deletes but never confirms them.
    struct UnconfirmedDeleteStore;

    #[async_trait]
    impl RecordStore for UnconfirmedDeleteStore {
        async fn get(&self, _id: &RecordId) -> Result<Option<Record>, StoreError> {
            Ok(None)
        }

        async fn put(&self, _record: Record) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, _id: &RecordId) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    fn dispatcher(domain: Domain) -> (ActionDispatcher, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        let dispatcher = ActionDispatcher::new(domain.table(), store.clone());
        (dispatcher, store)
    }

    fn body_json(envelope: &ResponseEnvelope) -> Value {
        serde_json::from_str(envelope.body()).expect("body should be a JSON document")
    }

    fn create_booking(guests: &str) -> Invocation {
        Invocation::new("RestaurantActionGroup", "create_booking")
            .with_parameter("date", "2024-06-01")
            .with_parameter("name", "Ada")
            .with_parameter("time", "19:00")
            .with_parameter("num_guests", guests)
    }

    async fn created_id(dispatcher: &ActionDispatcher, invocation: &Invocation) -> String {
        let envelope = dispatcher.dispatch(invocation).await;
        body_json(&envelope)["booking_id"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn unknown_function_is_rejected_without_store_calls() {
        for domain in Domain::ALL {
            let (dispatcher, store) = dispatcher(domain);
            let invocation = Invocation::new("AnyGroup", "update_booking")
                .with_parameter("booking_id", "abcd1234");

            let envelope = dispatcher.dispatch(&invocation).await;

            assert_eq!(envelope.body(), "Invalid function", "{domain}");
            assert_eq!(store.calls(), 0, "{domain}");
        }
    }

    #[tokio::test]
    async fn functions_of_other_domains_are_not_routed() {
        let (dispatcher, store) = dispatcher(Domain::Leave);

        let envelope = dispatcher.dispatch(&create_booking("2")).await;

        assert_eq!(envelope.body(), "Invalid function");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_missing_required_field_touches_nothing() {
        let (dispatcher, store) = dispatcher(Domain::Restaurant);
        let invocation = Invocation::new("RestaurantActionGroup", "create_booking")
            .with_parameter("date", "2024-06-01")
            .with_parameter("name", "Ada")
            .with_parameter("num_guests", "2");

        let envelope = dispatcher.dispatch(&invocation).await;

        assert_eq!(envelope.body(), "Missing required parameters");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn blank_required_field_counts_as_missing() {
        let (dispatcher, store) = dispatcher(Domain::Leave);
        let invocation = Invocation::new("HrActionGroup", "create_time_off_booking")
            .with_parameter("staff_name", "Grace")
            .with_parameter("start_date", "2024-07-01")
            .with_parameter("end_date", "2024-07-05")
            .with_parameter("reason", "   ");

        let envelope = dispatcher.dispatch(&invocation).await;

        assert_eq!(envelope.body(), "Missing required parameters");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn get_and_delete_without_key_name_the_missing_field() {
        let (dispatcher, store) = dispatcher(Domain::Shortlet);

        let get = dispatcher
            .dispatch(&Invocation::new("ShortletActionGroup", "get_shortlet_booking_details"))
            .await;
        let delete = dispatcher
            .dispatch(
                &Invocation::new("ShortletActionGroup", "delete_shortlet_booking")
                    .with_parameter("bookingId", "abcd1234"),
            )
            .await;

        assert_eq!(get.body(), "Missing booking_id parameter");
        assert_eq!(delete.body(), "Missing booking_id parameter");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn non_numeric_integer_field_is_a_validation_error() {
        let (dispatcher, store) = dispatcher(Domain::Restaurant);

        let envelope = dispatcher.dispatch(&create_booking("four")).await;

        assert_eq!(envelope.body(), "Invalid num_guests parameter: expected an integer");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_returns_fresh_id_distinct_from_inputs() {
        let (dispatcher, store) = dispatcher(Domain::Restaurant);
        let invocation = create_booking("2").with_parameter("booking_id", "caller01");

        let id = created_id(&dispatcher, &invocation).await;

        assert_eq!(id.len(), 8);
        assert!(invocation.parameters.iter().all(|parameter| parameter.value != id));
        assert_eq!(store.calls(), 1);
        assert!(store.inner.get(&RecordId("caller01".to_string())).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn absent_optional_field_is_not_stored() {
        let (dispatcher, store) = dispatcher(Domain::Restaurant);
        let invocation = Invocation::new("RestaurantActionGroup", "create_booking")
            .with_parameter("date", "2024-01-01")
            .with_parameter("name", "Ada")
            .with_parameter("time", "19:00")
            .with_parameter("num_guests", "2")
            .with_parameter("desired_food", "");

        let id = created_id(&dispatcher, &invocation).await;
        let stored = store.inner.get(&RecordId(id)).await.expect("get").expect("record stored");

        assert!(stored.attribute("desired_food").is_none());
        assert_eq!(stored.attributes.len(), 4);
    }

    #[tokio::test]
    async fn supplied_optional_field_is_stored() {
        let (dispatcher, _store) = dispatcher(Domain::Leave);
        let invocation = Invocation::new("HrActionGroup", "create_time_off_booking")
            .with_parameter("staff_name", "Grace")
            .with_parameter("start_date", "2024-07-01")
            .with_parameter("end_date", "2024-07-05")
            .with_parameter("reason", "family")
            .with_parameter("comment", "sister's wedding");

        let id = created_id(&dispatcher, &invocation).await;
        let get = dispatcher
            .dispatch(
                &Invocation::new("HrActionGroup", "get_time_off_booking_details")
                    .with_parameter("booking_id", id.clone()),
            )
            .await;

        assert_eq!(
            body_json(&get),
            json!({
                "booking_id": id,
                "staff_name": "Grace",
                "start_date": "2024-07-01",
                "end_date": "2024-07-05",
                "reason": "family",
                "comment": "sister's wedding"
            })
        );
    }

    #[tokio::test]
    async fn create_then_get_round_trips_the_booking() {
        let (dispatcher, store) = dispatcher(Domain::Restaurant);

        let id = created_id(&dispatcher, &create_booking("4")).await;
        assert_eq!(id.len(), 8);

        let get = Invocation::new("RestaurantActionGroup", "get_booking_details")
            .with_parameter("booking_id", id.clone());
        let envelope = dispatcher.dispatch(&get).await;

        assert_eq!(
            body_json(&envelope),
            json!({
                "booking_id": id,
                "date": "2024-06-01",
                "name": "Ada",
                "time": "19:00",
                "num_guests": 4
            })
        );
        assert_eq!(envelope.response.function, "get_booking_details");
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_a_normal_result() {
        let (dispatcher, store) = dispatcher(Domain::Reservation);
        let invocation = Invocation::new("ReservationActionGroup", "get_reservation_booking_details")
            .with_parameter("booking_id", "0badc0de");

        let envelope = dispatcher.dispatch(&invocation).await;

        assert_eq!(body_json(&envelope), json!({"message": "No booking found with ID 0badc0de"}));
        assert_eq!(envelope.response.action_group, "ReservationActionGroup");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn delete_confirms_removal_of_existing_booking() {
        let (dispatcher, store) = dispatcher(Domain::Restaurant);
        let id = created_id(&dispatcher, &create_booking("2")).await;

        let delete = Invocation::new("RestaurantActionGroup", "delete_booking")
            .with_parameter("booking_id", id.clone());
        let envelope = dispatcher.dispatch(&delete).await;

        assert_eq!(
            body_json(&envelope),
            json!({"message": format!("Booking with ID {id} deleted successfully")})
        );
        assert!(store.inner.is_empty().await);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_matches_unconfirmed_store_delete() {
        let (dispatcher, _store) = dispatcher(Domain::Ticket);
        let unconfirmed =
            ActionDispatcher::new(Domain::Ticket.table(), Arc::new(UnconfirmedDeleteStore));
        let invocation = Invocation::new("TicketActionGroup", "delete_ticket_booking")
            .with_parameter("booking_id", "feedface");

        let never_created = dispatcher.dispatch(&invocation).await;
        let store_refused = unconfirmed.dispatch(&invocation).await;

        assert_eq!(never_created, store_refused);
        assert_eq!(
            body_json(&never_created),
            json!({"message": "Failed to delete booking with ID feedface"})
        );
    }

    #[tokio::test]
    async fn store_faults_become_error_bodies() {
        let dispatcher = ActionDispatcher::new(Domain::Restaurant.table(), Arc::new(FailingStore));
        let get = Invocation::new("RestaurantActionGroup", "get_booking_details")
            .with_parameter("booking_id", "abcd1234");
        let delete = Invocation::new("RestaurantActionGroup", "delete_booking")
            .with_parameter("booking_id", "abcd1234");

        for invocation in [get, delete, create_booking("3")] {
            let envelope = dispatcher.dispatch(&invocation).await;
            assert_eq!(
                body_json(&envelope),
                json!({"error": "store unavailable: connection reset by peer"}),
                "{}",
                invocation.function
            );
            assert_eq!(envelope.response.function, invocation.function);
        }
    }

    #[tokio::test]
    async fn ticket_create_stamps_creation_date_from_clock() {
        let store = Arc::new(CountingStore::default());
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        let dispatcher = ActionDispatcher::new(Domain::Ticket.table(), store.clone())
            .with_clock(Arc::new(FixedClock(today)));
        let invocation = Invocation::new("TicketActionGroup", "create_ticket_booking")
            .with_parameter("name", "Ada")
            .with_parameter("incident_date", "2024-03-08")
            .with_parameter("reason", "overcharged")
            .with_parameter("creation_date", "01/01/1999");

        let id = created_id(&dispatcher, &invocation).await;
        let stored = store.inner.get(&RecordId(id)).await.expect("get").expect("stored");

        assert_eq!(
            stored.attribute("creation_date"),
            Some(&concierge_core::AttributeValue::Text("09/03/2024".to_string()))
        );
    }

    #[tokio::test]
    async fn shortlet_integers_are_typed() {
        let (dispatcher, store) = dispatcher(Domain::Shortlet);
        let invocation = Invocation::new("ShortletActionGroup", "create_shortlet_booking")
            .with_parameter("person_name", "Ada")
            .with_parameter("date", "2024-08-10")
            .with_parameter("number_days", " 3 ")
            .with_parameter("shortlet_type", "studio")
            .with_parameter("num_guests", "2");

        let id = created_id(&dispatcher, &invocation).await;
        let stored = store.inner.get(&RecordId(id)).await.expect("get").expect("stored");
        let item = Value::Object(stored.to_item("booking_id"));

        assert_eq!(item["number_days"], json!(3));
        assert_eq!(item["num_guests"], json!(2));
        assert_eq!(item["shortlet_type"], json!("studio"));
    }

    #[tokio::test]
    async fn envelope_echoes_invocation_metadata_on_every_outcome() {
        let (dispatcher, _store) = dispatcher(Domain::Restaurant);
        let mut invocation = Invocation::new("RestaurantActionGroup", "nope");
        invocation.message_version = "2.0".to_string();

        let envelope = dispatcher.dispatch(&invocation).await;

        assert_eq!(envelope.response.action_group, "RestaurantActionGroup");
        assert_eq!(envelope.response.function, "nope");
        assert_eq!(envelope.message_version, "2.0");
    }
}
