//! Cluster templates
//!
//! Two built-ins: `crunch`, the analysis cluster with a spot core fleet
//! and notebook services, and `cheap`, the smallest cluster that still
//! runs Spark, for smoke tests and scheduled jobs.

use super::{bootstrap, step};
use gridflow_config::Settings;
use gridflow_core::Node;
use serde_json::json;

fn ebs_config() -> serde_json::Value {
    json!({
        "EbsBlockDeviceConfigs": [{
            "VolumeSpecification": {"VolumeType": "gp2", "SizeInGB": 100},
            "VolumesPerInstance": 1,
        }]
    })
}

/// Two instance fleets: one on-demand master, spot cores that switch to
/// on-demand when the spot market dries up.
fn instance_fleets(instance_type: &str, core_capacity: i64) -> serde_json::Value {
    json!([
        {
            "Name": "Master",
            "InstanceFleetType": "MASTER",
            "TargetOnDemandCapacity": 1,
            "InstanceTypeConfigs": [{
                "InstanceType": instance_type,
                "EbsConfiguration": ebs_config(),
            }],
        },
        {
            "Name": "Core",
            "InstanceFleetType": "CORE",
            "TargetSpotCapacity": core_capacity,
            "InstanceTypeConfigs": [{
                "InstanceType": instance_type,
                "EbsConfiguration": ebs_config(),
            }],
            "LaunchSpecifications": {
                "SpotSpecification": {
                    "TimeoutDurationMinutes": 60,
                    "TimeoutAction": "SWITCH_TO_ON_DEMAND",
                }
            },
        },
    ])
}

fn spark_env() -> serde_json::Value {
    json!({
        "Classification": "spark-env",
        "Properties": {},
        "Configurations": [{
            "Classification": "export",
            "Properties": {"PYSPARK_PYTHON": "python3"},
            "Configurations": [],
        }],
    })
}

fn spark_defaults() -> serde_json::Value {
    json!({
        "Classification": "spark-defaults",
        "Properties": {"spark.serializer": "org.apache.spark.serializer.KryoSerializer"},
    })
}

fn spark_alloc() -> serde_json::Value {
    json!({
        "Classification": "spark",
        "Properties": {"maximizeResourceAllocation": "true"},
    })
}

/// Zeppelin notebooks persisted to the caller's S3 location.
fn zeppelin_s3() -> serde_json::Value {
    json!({
        "Classification": "zeppelin-env",
        "Properties": {},
        "Configurations": [{
            "Classification": "export",
            "Properties": {
                "ZEPPELIN_NOTEBOOK_S3_BUCKET": "{s3bucket}",
                "ZEPPELIN_NOTEBOOK_S3_USER": "{s3prefix}/zeppelin",
                "ZEPPELIN_NOTEBOOK_STORAGE": "org.apache.zeppelin.notebook.repo.S3NotebookRepo",
            },
            "Configurations": [],
        }],
    })
}

fn base_cluster(
    settings: &Settings,
    name: &str,
    instance_type: &str,
    core_capacity: i64,
) -> Node {
    let mut doc = Node::from(json!({
        "Name": name,
        "LogUri": settings.log_uri(),
        "ReleaseLabel": "emr-6.15.0",
        "Instances": {
            "InstanceFleets": instance_fleets(instance_type, core_capacity),
            "Ec2KeyName": settings.ec2_key_name,
            "KeepJobFlowAliveWhenNoSteps": true,
            "TerminationProtected": false,
        },
        "BootstrapActions": [],
        "Applications": [{"Name": "Hadoop"}, {"Name": "Spark"}, {"Name": "Zeppelin"}],
        "Steps": [],
        "Configurations": [],
        "ServiceRole": "EMR_DefaultRole",
        "JobFlowRole": "EMR_EC2_DefaultRole",
        "VisibleToAllUsers": true,
        "Tags": [{"Key": "gridflow", "Value": env!("CARGO_PKG_VERSION")}],
        "ScaleDownBehavior": "TERMINATE_AT_TASK_COMPLETION",
        "EbsRootVolumeSize": 10,
    }));

    doc.insert(
        "BootstrapActions",
        Node::Seq(vec![bootstrap::install_gridflow(settings)]),
    );

    if let Some(instances) = doc.get_mut("Instances") {
        if !settings.ec2_subnet_ids.is_empty() {
            instances.insert(
                "Ec2SubnetIds",
                Node::Seq(
                    settings
                        .ec2_subnet_ids
                        .iter()
                        .map(|id| Node::from(id.as_str()))
                        .collect(),
                ),
            );
        }
        if let Some(group) = &settings.emr_master_security_group {
            instances.insert("EmrManagedMasterSecurityGroup", Node::from(group.as_str()));
        }
        if let Some(group) = &settings.emr_worker_security_group {
            instances.insert("EmrManagedSlaveSecurityGroup", Node::from(group.as_str()));
        }
    }

    doc
}

/// The analysis cluster: spot core fleet, Jupyter and Zeppelin with S3
/// notebook persistence, notification on readiness. Needs `s3bucket` and
/// `s3prefix` parameters for the notebook location.
pub fn crunch(settings: &Settings) -> Node {
    let mut doc = base_cluster(settings, "crunch", "r5.2xlarge", 8);

    doc.insert(
        "Configurations",
        Node::from(json!([
            spark_env(),
            zeppelin_s3(),
            spark_defaults(),
            spark_alloc(),
        ])),
    );
    doc.insert(
        "Steps",
        Node::Seq(vec![
            step::jupyter_s3(),
            step::NotifyStep::new(["--if-master", "--cluster-ready"]).into_node(),
        ]),
    );
    doc
}

/// The smallest cluster that still runs Spark.
pub fn cheap(settings: &Settings) -> Node {
    let mut doc = base_cluster(settings, "cheap", "m5.large", 1);

    doc.insert(
        "Configurations",
        Node::from(json!([spark_env(), spark_defaults(), spark_alloc()])),
    );
    doc
}
