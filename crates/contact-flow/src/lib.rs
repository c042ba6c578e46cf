//! Typed view of the Amazon Connect contact-flow invocation event
//!
//! A passive decoder: required fields must be present and enum fields must
//! hold one of their documented literals. There are no cross-field rules.
//!
//! ```
//! use connect_contact_flow::{Channel, ContactFlowEvent};
//! use serde_json::json;
//!
//! let event = ContactFlowEvent::from_json_value(json!({
//!     "Details": {
//!         "ContactData": {
//!             "Attributes": {},
//!             "Channel": "CHAT",
//!             "ContactId": "c-1",
//!             "InitialContactId": "c-1",
//!             "InitiationMethod": "API",
//!             "InstanceARN": "arn:aws:connect:us-east-1:123456789012:instance/minimal",
//!             "PreviousContactId": "c-0",
//!             "MediaStreams": { "Customer": { "Audio": {} } }
//!         },
//!         "Parameters": {}
//!     }
//! })).unwrap();
//!
//! assert_eq!(event.contact_data().channel(), Channel::Chat);
//! assert!(event.contact_data().queue().is_none());
//! ```

pub mod enums;
pub mod error;
pub mod event;

pub use enums::{Channel, EndpointType, InitiationMethod, InvalidLiteral, ReferenceStatus, ReferenceType};
pub use error::{ContactFlowError, ContactFlowErrorKind};
pub use event::{
    AdditionalEmailRecipients, AudioStream, ContactData, ContactFlowEvent, ContactFlowEventDetails,
    CustomerMediaStream, Endpoint, MediaStreams, Queue, Reference, SegmentAttributeValue,
};

pub type Result<T> = std::result::Result<T, ContactFlowError>;
