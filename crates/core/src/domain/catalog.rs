//! The five booking domains and their operation tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::schema::{
    ActionTable, FieldSpec, GeneratedField, GeneratedValue, OperationSpec,
};

pub const BOOKING_KEY: &str = "booking_id";
pub const TICKET_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Single-agent restaurant deployment with unprefixed function names.
    Restaurant,
    Reservation,
    Leave,
    Shortlet,
    Ticket,
}

impl Domain {
    pub const ALL: [Domain; 5] =
        [Self::Restaurant, Self::Reservation, Self::Leave, Self::Shortlet, Self::Ticket];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Reservation => "reservation",
            Self::Leave => "leave",
            Self::Shortlet => "shortlet",
            Self::Ticket => "ticket",
        }
    }

    pub fn table(&self) -> ActionTable {
        match self {
            Self::Restaurant => restaurant(),
            Self::Reservation => reservation(),
            Self::Leave => leave(),
            Self::Shortlet => shortlet(),
            Self::Ticket => ticket(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDomain(pub String);

impl fmt::Display for UnknownDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown domain `{}` (expected restaurant|reservation|leave|shortlet|ticket)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDomain {}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(Self::Restaurant),
            "reservation" => Ok(Self::Reservation),
            "leave" | "hr" => Ok(Self::Leave),
            "shortlet" | "short-let" => Ok(Self::Shortlet),
            "ticket" | "ticketing" => Ok(Self::Ticket),
            other => Err(UnknownDomain(other.to_string())),
        }
    }
}

fn dining_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("date", "The date of the booking"),
        FieldSpec::required("name", "The name of the customer placing a booking"),
        FieldSpec::required("time", "The time of the booking"),
        FieldSpec::required("num_guests", "The number of guests in the booking").integer(),
        FieldSpec::optional("desired_food", "The desired food"),
    ]
}

fn restaurant() -> ActionTable {
    ActionTable {
        domain: Domain::Restaurant,
        description: "Actions for creating, retrieving and cancelling restaurant table bookings",
        key_attribute: BOOKING_KEY,
        record_label: "booking",
        operations: vec![
            OperationSpec::get(
                "get_booking_details",
                "Retrieve details of a restaurant booking",
                BOOKING_KEY,
            ),
            OperationSpec::create(
                "create_booking",
                "Create a new restaurant booking",
                dining_fields(),
            ),
            OperationSpec::delete(
                "delete_booking",
                "Delete an existing restaurant booking",
                BOOKING_KEY,
            ),
        ],
    }
}

fn reservation() -> ActionTable {
    ActionTable {
        domain: Domain::Reservation,
        description: "Actions for managing steakhouse table reservations",
        key_attribute: BOOKING_KEY,
        record_label: "booking",
        operations: vec![
            OperationSpec::get(
                "get_reservation_booking_details",
                "Retrieve details of a steakhouse reservation booking",
                BOOKING_KEY,
            ),
            OperationSpec::create(
                "create_reservation_booking",
                "Create a new steakhouse reservation booking",
                dining_fields(),
            ),
            OperationSpec::delete(
                "delete_reservation_booking",
                "Delete an existing steakhouse reservation booking",
                BOOKING_KEY,
            ),
        ],
    }
}

fn leave() -> ActionTable {
    ActionTable {
        domain: Domain::Leave,
        description: "Actions for managing staff time-off requests",
        key_attribute: BOOKING_KEY,
        record_label: "booking",
        operations: vec![
            OperationSpec::get(
                "get_time_off_booking_details",
                "Retrieve details of a staff time-off booking",
                BOOKING_KEY,
            ),
            OperationSpec::create(
                "create_time_off_booking",
                "Create a new staff time-off booking",
                vec![
                    FieldSpec::required("staff_name", "The name of staff"),
                    FieldSpec::required("start_date", "The start date of the time off"),
                    FieldSpec::required("end_date", "The end date of the time off"),
                    FieldSpec::required("reason", "The reason of the time off"),
                    FieldSpec::optional("comment", "Detailed comment for taking time off"),
                ],
            ),
            OperationSpec::delete(
                "delete_time_off_booking",
                "Delete an existing staff time-off booking",
                BOOKING_KEY,
            ),
        ],
    }
}

fn shortlet() -> ActionTable {
    ActionTable {
        domain: Domain::Shortlet,
        description: "Actions for managing short-let apartment stays",
        key_attribute: BOOKING_KEY,
        record_label: "booking",
        operations: vec![
            OperationSpec::get(
                "get_shortlet_booking_details",
                "Retrieve details of a short-let booking",
                BOOKING_KEY,
            ),
            OperationSpec::create(
                "create_shortlet_booking",
                "Create a new short-let booking",
                vec![
                    FieldSpec::required("person_name", "The name of the customer placing a booking"),
                    FieldSpec::required("date", "The check-in date of the booking"),
                    FieldSpec::required("number_days", "Number of intended days to stay").integer(),
                    FieldSpec::required("shortlet_type", "Shortlet type"),
                    FieldSpec::required("num_guests", "The number of guests in the booking")
                        .integer(),
                ],
            ),
            OperationSpec::delete(
                "delete_shortlet_booking",
                "Delete an existing short-let booking",
                BOOKING_KEY,
            ),
        ],
    }
}

fn ticket() -> ActionTable {
    ActionTable {
        domain: Domain::Ticket,
        description: "Actions for raising and tracking customer support tickets",
        key_attribute: BOOKING_KEY,
        record_label: "booking",
        operations: vec![
            OperationSpec::get(
                "get_ticket_booking_details",
                "Retrieve details of a support ticket",
                BOOKING_KEY,
            ),
            OperationSpec::create(
                "create_ticket_booking",
                "Raise a new support ticket",
                vec![
                    FieldSpec::required("name", "The name of customer creating a ticket"),
                    FieldSpec::required("incident_date", "Date of incident"),
                    FieldSpec::required("reason", "Reason for creating ticket"),
                ],
            )
            .with_generated(GeneratedField {
                name: "creation_date",
                value: GeneratedValue::CurrentDate { format: TICKET_DATE_FORMAT },
            }),
            OperationSpec::delete(
                "delete_ticket_booking",
                "Delete an existing support ticket",
                BOOKING_KEY,
            ),
        ],
    }
}
