use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use concierge_core::config::ActionGroupConfig;
use concierge_core::{
    ActionGroupDefinition, ActionTable, ApplicationError, Domain, Invocation, ResponseEnvelope,
};
use concierge_db::RecordStore;

use crate::dispatcher::ActionDispatcher;

/// Anything that can answer invocations for one domain's action group.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn table(&self) -> &ActionTable;
    async fn handle(&self, invocation: &Invocation) -> ResponseEnvelope;
}

#[async_trait]
impl ActionHandler for ActionDispatcher {
    fn table(&self) -> &ActionTable {
        ActionDispatcher::table(self)
    }

    async fn handle(&self, invocation: &Invocation) -> ResponseEnvelope {
        self.dispatch(invocation).await
    }
}

/// Routes invocations to handlers by action-group name or by domain.
#[derive(Default)]
pub struct ActionGroupRegistry {
    handlers: HashMap<Domain, Arc<dyn ActionHandler>>,
    groups: HashMap<String, Domain>,
}

impl ActionGroupRegistry {
    /// Registers `handler` under `action_group`, replacing any previous
    /// handler for the same domain.
    pub fn register<H>(&mut self, action_group: impl Into<String>, handler: H)
    where
        H: ActionHandler + 'static,
    {
        let domain = handler.table().domain;
        self.groups.retain(|_, registered| *registered != domain);
        self.groups.insert(action_group.into(), domain);
        self.handlers.insert(domain, Arc::new(handler));
    }

    /// One dispatcher per domain, all sharing `store`.
    pub fn from_config(config: &ActionGroupConfig, store: Arc<dyn RecordStore>) -> Self {
        let mut registry = Self::default();
        for domain in Domain::ALL {
            registry.register(
                config.name_for(domain),
                ActionDispatcher::new(domain.table(), store.clone()),
            );
        }
        registry
    }

    pub fn route(&self, action_group: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.groups.get(action_group).and_then(|domain| self.handlers.get(domain))
    }

    pub fn for_domain(&self, domain: Domain) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(&domain)
    }

    pub fn action_group_for(&self, domain: Domain) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, registered)| **registered == domain)
            .map(|(name, _)| name.as_str())
    }

    /// Function-schema documents for every registered group, in domain order.
    pub fn definitions(&self) -> Vec<ActionGroupDefinition> {
        Domain::ALL
            .into_iter()
            .filter_map(|domain| {
                let handler = self.handlers.get(&domain)?;
                let group = self.action_group_for(domain)?;
                Some(handler.table().definition(group))
            })
            .collect()
    }

    pub async fn dispatch(
        &self,
        invocation: &Invocation,
    ) -> Result<ResponseEnvelope, ApplicationError> {
        let handler = self
            .route(&invocation.action_group)
            .ok_or_else(|| ApplicationError::UnknownActionGroup(invocation.action_group.clone()))?;
        Ok(handler.handle(invocation).await)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
