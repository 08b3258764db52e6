//! AWS SDK instance source
//!
//! Answers [`InstanceSource::describe_instances`] with a single
//! `DescribeInstances` call through `aws-sdk-ec2`. Credentials come from the
//! standard AWS chain:
//! 1. Environment variables (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY)
//! 2. Shared credentials file (~/.aws/credentials), optionally a named profile
//! 3. IAM role (if running on EC2)
//!
//! The lookup interface is synchronous, so each call drives the SDK on its
//! own current-thread runtime. Do not call this from inside an async runtime.

use super::ec2::{DescribeInstancesRequest, Instance, InstanceSource, InstanceState, Reservation};
use super::{LookupError, LookupResult};
use crate::config::AwsConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Filter;

/// Instance source backed by the EC2 API
#[derive(Debug, Clone, Default)]
pub struct SdkInstanceSource {
    profile: Option<String>,
    endpoint_url: Option<String>,
}

impl SdkInstanceSource {
    /// Create a source using the default credential chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from the `[aws]` config section
    pub fn from_config(config: &AwsConfig) -> Self {
        Self {
            profile: config.profile.clone(),
            endpoint_url: config.endpoint_url.clone(),
        }
    }

    /// Send requests to a custom endpoint
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    async fn describe(&self, request: &DescribeInstancesRequest) -> LookupResult<Vec<Reservation>> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(request.region.clone()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(request.timeout)
                    .build(),
            );

        if let Some(ref profile) = self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(ref endpoint) = self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let shared_config = loader.load().await;
        let client = aws_sdk_ec2::Client::new(&shared_config);

        let mut call = client.describe_instances();
        for filter in &request.filters {
            call = call.filters(
                Filter::builder()
                    .name(&filter.name)
                    .set_values(Some(filter.values.clone()))
                    .build(),
            );
        }

        let output = call
            .send()
            .await
            .map_err(|e| LookupError::Provider(DisplayErrorContext(&e).to_string()))?;

        output.reservations().iter().map(convert_reservation).collect()
    }
}

fn convert_reservation(reservation: &aws_sdk_ec2::types::Reservation) -> LookupResult<Reservation> {
    let instances = reservation
        .instances()
        .iter()
        .map(convert_instance)
        .collect::<LookupResult<Vec<_>>>()?;

    Ok(Reservation {
        reservation_id: reservation.reservation_id().map(str::to_string),
        instances,
    })
}

fn convert_instance(instance: &aws_sdk_ec2::types::Instance) -> LookupResult<Instance> {
    let instance_id = instance
        .instance_id()
        .ok_or_else(|| LookupError::MissingField("InstanceId".to_string()))?;

    let state = instance.state().and_then(|s| {
        s.name().map(|name| InstanceState {
            code: s.code(),
            name: name.as_str().to_string(),
        })
    });

    Ok(Instance {
        instance_id: instance_id.to_string(),
        state,
    })
}

impl InstanceSource for SdkInstanceSource {
    fn describe_instances(&self, request: &DescribeInstancesRequest) -> LookupResult<Vec<Reservation>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LookupError::Runtime(e.to_string()))?;

        runtime.block_on(self.describe(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{InstanceStateName, Reservation as SdkReservation};

    #[test]
    fn test_from_config() {
        let config = AwsConfig {
            profile: Some("ops".to_string()),
            endpoint_url: Some("http://localhost:4566".to_string()),
            timeout: 10,
        };
        let source = SdkInstanceSource::from_config(&config);
        assert_eq!(source.profile.as_deref(), Some("ops"));
        assert_eq!(source.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_convert_reservation() {
        let sdk = SdkReservation::builder()
            .reservation_id("r-123")
            .instances(
                aws_sdk_ec2::types::Instance::builder()
                    .instance_id("i-abc")
                    .state(
                        aws_sdk_ec2::types::InstanceState::builder()
                            .code(80)
                            .name(InstanceStateName::Stopped)
                            .build(),
                    )
                    .build(),
            )
            .instances(aws_sdk_ec2::types::Instance::builder().instance_id("i-def").build())
            .build();

        let reservation = convert_reservation(&sdk).unwrap();
        assert_eq!(reservation.reservation_id.as_deref(), Some("r-123"));
        assert_eq!(reservation.instances.len(), 2);
        assert_eq!(reservation.instances[0].state_name(), Some("stopped"));
        assert_eq!(reservation.instances[0].state.as_ref().unwrap().code, Some(80));
        assert_eq!(reservation.instances[1].instance_id, "i-def");
        assert!(reservation.instances[1].state.is_none());
    }

    #[test]
    fn test_convert_instance_missing_id() {
        let sdk = aws_sdk_ec2::types::Instance::builder().build();
        let result = convert_instance(&sdk);
        assert!(matches!(result, Err(LookupError::MissingField(_))));
    }
}
