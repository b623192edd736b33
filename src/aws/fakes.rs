//! In-memory provider fakes with call counters, used by unit tests to
//! assert idempotency (zero mutating calls on re-entry) and request shape.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::{ProviderError, ResourceKind};
use super::{IamApi, StorageApi, WorkflowApi};
use crate::core::types::{
    CreateWorkflowRequest, RunDescriptor, StartRunRequest, WorkflowDescriptor, WorkflowStatus,
    WorkflowSummary,
};

#[derive(Default)]
pub struct FakeIam {
    pub roles: Mutex<HashMap<String, String>>,
    pub create_role_calls: Mutex<u32>,
    pub create_policy_calls: Mutex<u32>,
    pub attach_calls: Mutex<u32>,
    pub lookup_error: Mutex<Option<ProviderError>>,
}

impl FakeIam {
    pub fn with_role(role_name: &str, arn: &str) -> Self {
        let fake = FakeIam::default();
        fake.roles
            .lock()
            .unwrap()
            .insert(role_name.to_string(), arn.to_string());
        fake
    }
}

#[async_trait]
impl IamApi for FakeIam {
    async fn get_role_arn(&self, role_name: &str) -> Result<String, ProviderError> {
        if let Some(err) = self.lookup_error.lock().unwrap().take() {
            return Err(err);
        }
        self.roles
            .lock()
            .unwrap()
            .get(role_name)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(ResourceKind::Role, role_name))
    }

    async fn create_role(
        &self,
        role_name: &str,
        _assume_role_policy: &str,
        _description: &str,
    ) -> Result<String, ProviderError> {
        *self.create_role_calls.lock().unwrap() += 1;
        let arn = format!("arn:aws:iam::123456789012:role/{}", role_name);
        self.roles
            .lock()
            .unwrap()
            .insert(role_name.to_string(), arn.clone());
        Ok(arn)
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        _description: &str,
        _document: &str,
    ) -> Result<String, ProviderError> {
        *self.create_policy_calls.lock().unwrap() += 1;
        Ok(format!("arn:aws:iam::123456789012:policy/{}", policy_name))
    }

    async fn attach_role_policy(
        &self,
        _role_name: &str,
        _policy_arn: &str,
    ) -> Result<(), ProviderError> {
        *self.attach_calls.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeStorage {
    pub buckets: Mutex<Vec<String>>,
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub create_bucket_calls: Mutex<u32>,
    pub put_calls: Mutex<u32>,
    pub head_error: Mutex<Option<ProviderError>>,
}

impl FakeStorage {
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{}/{}", bucket, key))
            .cloned()
    }
}

#[async_trait]
impl StorageApi for FakeStorage {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ProviderError> {
        if let Some(err) = self.head_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.buckets.lock().unwrap().iter().any(|b| b == bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), ProviderError> {
        *self.create_bucket_calls.lock().unwrap() += 1;
        self.buckets.lock().unwrap().push(bucket.to_string());
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ProviderError> {
        *self.put_calls.lock().unwrap() += 1;
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", bucket, key), body);
        Ok(())
    }
}

pub struct FakeWorkflowService {
    pub workflows: Mutex<Vec<WorkflowDescriptor>>,
    pub create_calls: Mutex<u32>,
    pub create_requests: Mutex<Vec<CreateWorkflowRequest>>,
    pub start_run_requests: Mutex<Vec<StartRunRequest>>,
    /// Statuses handed out by successive `get_workflow` calls; the last one
    /// repeats once the script is exhausted.
    pub status_script: Mutex<Vec<WorkflowStatus>>,
    pub status_message: Mutex<Option<String>>,
    pub next_id: String,
}

impl Default for FakeWorkflowService {
    fn default() -> Self {
        FakeWorkflowService {
            workflows: Mutex::new(Vec::new()),
            create_calls: Mutex::new(0),
            create_requests: Mutex::new(Vec::new()),
            start_run_requests: Mutex::new(Vec::new()),
            status_script: Mutex::new(vec![WorkflowStatus::Active]),
            status_message: Mutex::new(None),
            next_id: "1234567".to_string(),
        }
    }
}

impl FakeWorkflowService {
    pub fn with_workflow(id: &str, name: &str, status: WorkflowStatus) -> Self {
        let fake = FakeWorkflowService::default();
        fake.workflows.lock().unwrap().push(WorkflowDescriptor {
            id: id.to_string(),
            arn: None,
            name: name.to_string(),
            status,
            status_message: None,
            creation_time: None,
        });
        fake
    }

    fn next_status(&self) -> WorkflowStatus {
        let mut script = self.status_script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().cloned().unwrap_or(WorkflowStatus::Active)
        }
    }
}

#[async_trait]
impl WorkflowApi for FakeWorkflowService {
    async fn find_workflow_by_name(
        &self,
        name: &str,
    ) -> Result<Option<WorkflowSummary>, ProviderError> {
        Ok(self
            .workflows
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.name == name)
            .map(|w| WorkflowSummary {
                id: w.id.clone(),
                name: w.name.clone(),
                status: w.status.clone(),
            }))
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ProviderError> {
        Ok(self
            .workflows
            .lock()
            .unwrap()
            .iter()
            .map(|w| WorkflowSummary {
                id: w.id.clone(),
                name: w.name.clone(),
                status: w.status.clone(),
            })
            .collect())
    }

    async fn create_workflow(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<String, ProviderError> {
        *self.create_calls.lock().unwrap() += 1;
        let id = self.next_id.clone();
        self.workflows.lock().unwrap().push(WorkflowDescriptor {
            id: id.clone(),
            arn: None,
            name: request.name.clone(),
            status: WorkflowStatus::Creating,
            status_message: None,
            creation_time: None,
        });
        self.create_requests.lock().unwrap().push(request);
        Ok(id)
    }

    async fn get_workflow(&self, id: &str) -> Result<WorkflowDescriptor, ProviderError> {
        let name = self
            .workflows
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.name.clone())
            .ok_or_else(|| ProviderError::not_found(ResourceKind::Workflow, id))?;
        Ok(WorkflowDescriptor {
            id: id.to_string(),
            arn: None,
            name,
            status: self.next_status(),
            status_message: self.status_message.lock().unwrap().clone(),
            creation_time: None,
        })
    }

    async fn start_run(&self, request: StartRunRequest) -> Result<RunDescriptor, ProviderError> {
        let id = format!("run-{}", self.start_run_requests.lock().unwrap().len() + 1);
        self.start_run_requests.lock().unwrap().push(request);
        Ok(RunDescriptor {
            id,
            arn: None,
            status: Some("PENDING".to_string()),
        })
    }
}
