//! EC2 Instance Lookup Plugins
//!
//! Lists instance identifiers in a region. Similar to a custom Ansible lookup
//! built on `describe_instances`.
//!
//! # Usage
//!
//! ```yaml
//! # Every instance in the region
//! ids: "{{ lookup('aws_ec2', 'us-east-1') }}"
//!
//! # Instances in a given lifecycle state (default: running)
//! stopped: "{{ lookup('aws_ec2_extended', 'us-east-1', state='stopped') }}"
//! ```
//!
//! # Options (`aws_ec2_extended` only)
//!
//! - `state` (string): instance state name, or a comma-separated list of them
//!   (default: `running`). Sent to the provider as the `instance-state-name`
//!   filter.

use super::{Lookup, LookupContext, LookupError, LookupResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Server-side filter name for the instance lifecycle state
pub const STATE_FILTER: &str = "instance-state-name";

/// State requested when the extended lookup gets no `state` option
pub const DEFAULT_STATE: &str = "running";

/// Lifecycle state of an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceState {
    /// Numeric state code, when the provider reports one
    #[serde(default)]
    pub code: Option<i32>,
    /// State name, e.g. `running` or `stopped`
    pub name: String,
}

/// A compute instance as reported by DescribeInstances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    /// Instance identifier
    pub instance_id: String,
    /// Lifecycle state
    #[serde(default)]
    pub state: Option<InstanceState>,
}

impl Instance {
    /// Create an instance record in the given state
    pub fn new(instance_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            state: Some(InstanceState {
                code: None,
                name: state.into(),
            }),
        }
    }

    /// State name, if known
    pub fn state_name(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.name.as_str())
    }
}

/// Instances launched together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    /// Reservation identifier
    #[serde(default)]
    pub reservation_id: Option<String>,
    /// Instances in provider order
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl Reservation {
    /// Create a reservation holding the given instances
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            reservation_id: None,
            instances,
        }
    }
}

/// A server-side filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceFilter {
    /// Filter name, e.g. `instance-state-name`
    pub name: String,
    /// Accepted values
    pub values: Vec<String>,
}

impl InstanceFilter {
    /// Filter on instance lifecycle state
    pub fn state(values: Vec<String>) -> Self {
        Self {
            name: STATE_FILTER.to_string(),
            values,
        }
    }
}

/// One DescribeInstances call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeInstancesRequest {
    /// Region to query
    pub region: String,
    /// Server-side filters; empty means every instance
    pub filters: Vec<InstanceFilter>,
    /// Transport timeout
    pub timeout: Duration,
}

impl DescribeInstancesRequest {
    /// Request every instance in a region
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            filters: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Add a server-side filter
    pub fn with_filter(mut self, filter: InstanceFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the transport timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Something that can answer DescribeInstances
#[cfg_attr(test, mockall::automock)]
pub trait InstanceSource: Send + Sync {
    /// Issue exactly one describe call and return the reservations in
    /// provider order
    fn describe_instances(&self, request: &DescribeInstancesRequest) -> LookupResult<Vec<Reservation>>;
}

/// Concatenate instance identifiers across reservations, in encountered order
pub fn flatten_instance_ids(reservations: &[Reservation]) -> Vec<String> {
    reservations
        .iter()
        .flat_map(|r| r.instances.iter())
        .map(|i| i.instance_id.clone())
        .collect()
}

fn region_term(lookup: &dyn Lookup, args: &[&str]) -> LookupResult<String> {
    let region = lookup
        .terms(args)
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::MissingArgument("region".to_string()))?;

    let region = region.trim();
    if region.is_empty() {
        return Err(LookupError::InvalidArguments(
            "region cannot be empty".to_string(),
        ));
    }

    Ok(region.to_string())
}

fn run(
    source: &dyn InstanceSource,
    request: &DescribeInstancesRequest,
) -> LookupResult<Vec<String>> {
    debug!(region = %request.region, filters = ?request.filters, "describing instances");

    let reservations = source.describe_instances(request)?;
    let ids = flatten_instance_ids(&reservations);

    info!(
        region = %request.region,
        reservations = reservations.len(),
        instances = ids.len(),
        "instance lookup complete"
    );

    Ok(ids)
}

/// `aws_ec2` lookup: every instance ID in a region
pub struct Ec2Lookup {
    source: Arc<dyn InstanceSource>,
}

impl Ec2Lookup {
    /// Create a new Ec2Lookup querying the given source
    pub fn new(source: Arc<dyn InstanceSource>) -> Self {
        Self { source }
    }
}

impl Lookup for Ec2Lookup {
    fn name(&self) -> &'static str {
        "aws_ec2"
    }

    fn description(&self) -> &'static str {
        "Lists EC2 instance IDs in a region"
    }

    fn lookup(&self, args: &[&str], context: &LookupContext) -> LookupResult<Vec<String>> {
        let region = region_term(self, args)?;
        let request = DescribeInstancesRequest::new(region)
            .with_timeout(Duration::from_secs(context.timeout_secs));

        run(self.source.as_ref(), &request)
    }
}

/// `aws_ec2_extended` lookup: instance IDs in a region, filtered by state
pub struct Ec2StateLookup {
    source: Arc<dyn InstanceSource>,
}

impl Ec2StateLookup {
    /// Create a new Ec2StateLookup querying the given source
    pub fn new(source: Arc<dyn InstanceSource>) -> Self {
        Self { source }
    }

    fn parse_states(value: &str) -> LookupResult<Vec<String>> {
        let states: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();

        if states.iter().any(String::is_empty) {
            return Err(LookupError::InvalidArguments(format!(
                "Invalid state value: '{}'",
                value
            )));
        }

        Ok(states)
    }
}

impl Lookup for Ec2StateLookup {
    fn name(&self) -> &'static str {
        "aws_ec2_extended"
    }

    fn description(&self) -> &'static str {
        "Lists EC2 instance IDs in a region filtered by instance state"
    }

    fn lookup(&self, args: &[&str], context: &LookupContext) -> LookupResult<Vec<String>> {
        let region = region_term(self, args)?;
        let options = self.parse_options(args);

        let states = match options.get("state") {
            Some(value) => Self::parse_states(value)?,
            None => vec![DEFAULT_STATE.to_string()],
        };

        let request = DescribeInstancesRequest::new(region)
            .with_filter(InstanceFilter::state(states))
            .with_timeout(Duration::from_secs(context.timeout_secs));

        run(self.source.as_ref(), &request)
    }
}
