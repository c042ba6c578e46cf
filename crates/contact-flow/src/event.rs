//! Amazon Connect contact-flow invocation event
//!
//! Mirrors the document Amazon Connect sends when a contact flow invokes a
//! function:
//!
//! ```text
//! { "Details": { "ContactData": { ... }, "Parameters": { "key": "value" } },
//!   "Name": "ContactFlowEvent" }
//! ```
//!
//! Field names follow the wire casing through serde renames; Rust-side names
//! are snake_case. Optional fields are omitted on serialization when unset.
//!
//! See <https://docs.aws.amazon.com/connect/latest/adminguide/connect-lambda-functions.html>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{Channel, EndpointType, InitiationMethod, ReferenceStatus, ReferenceType};
use crate::error::ContactFlowError;

/// Top-level event passed to the invoked function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactFlowEvent {
    pub details: ContactFlowEventDetails,
}

impl ContactFlowEvent {
    /// Decode an already-parsed JSON document
    pub fn from_json_value(value: Value) -> Result<Self, ContactFlowError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ContactFlowError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String, ContactFlowError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Always present; some of its fields are optional
    pub fn contact_data(&self) -> &ContactData {
        &self.details.contact_data
    }

    /// Parameters configured on the invoke block of the flow
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.details.parameters
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactFlowEventDetails {
    pub contact_data: ContactData,
    pub parameters: HashMap<String, String>,
}

/// Metadata of the contact that triggered the flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactData {
    /// Attributes set earlier in the flow; may be empty
    pub attributes: HashMap<String, String>,
    pub channel: Channel,
    pub contact_id: String,
    pub initial_contact_id: String,
    pub initiation_method: InitiationMethod,
    #[serde(rename = "InstanceARN")]
    pub instance_arn: String,
    pub previous_contact_id: String,
    pub media_streams: MediaStreams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_endpoint: Option<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_endpoint: Option<Endpoint>,
    /// Null outside of a queue context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<Queue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<HashMap<String, Reference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_contact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_attributes: Option<HashMap<String, SegmentAttributeValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_email_recipients: Option<AdditionalEmailRecipients>,
}

impl ContactData {
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    /// Identifier of the first contact in a chain of transfers
    pub fn initial_contact_id(&self) -> &str {
        &self.initial_contact_id
    }

    pub fn initiation_method(&self) -> InitiationMethod {
        self.initiation_method
    }

    pub fn instance_arn(&self) -> &str {
        &self.instance_arn
    }

    /// Identifier of the contact before the most recent transfer
    pub fn previous_contact_id(&self) -> &str {
        &self.previous_contact_id
    }

    pub fn media_streams(&self) -> &MediaStreams {
        &self.media_streams
    }

    pub fn customer_endpoint(&self) -> Option<&Endpoint> {
        self.customer_endpoint.as_ref()
    }

    /// The address the customer dialed or wrote to
    pub fn system_endpoint(&self) -> Option<&Endpoint> {
        self.system_endpoint.as_ref()
    }

    pub fn queue(&self) -> Option<&Queue> {
        self.queue.as_ref()
    }

    /// Look up a contact attribute by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    pub address: String,
    #[serde(rename = "Type")]
    pub endpoint_type: EndpointType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Endpoint {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn endpoint_type(&self) -> EndpointType {
        self.endpoint_type
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Queue {
    #[serde(rename = "ARN")]
    pub arn: String,
    pub name: String,
}

impl Queue {
    pub fn arn(&self) -> &str {
        &self.arn
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStreams {
    pub customer: CustomerMediaStream,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerMediaStream {
    pub audio: AudioStream,
}

/// Kinesis Video stream carrying the customer's audio, when live media streaming is on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioStream {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_fragment_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
    #[serde(rename = "StreamARN", default, skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,
}

/// A reference attached to the contact (URL, attachment, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReferenceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<ReferenceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Value of a segment attribute; lists and maps nest further values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentAttributeValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_integer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<Vec<SegmentAttributeValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<HashMap<String, SegmentAttributeValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalEmailRecipients {
    #[serde(default)]
    pub cc_list: Vec<String>,
    #[serde(default)]
    pub to_list: Vec<String>,
}
