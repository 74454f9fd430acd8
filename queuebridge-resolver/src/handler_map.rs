//! Queue name -> handler assignment table

use std::collections::HashMap;
use std::fmt;

use crate::error::{ConfigError, LookupError};

/// Handler state of a declared queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Unassigned,
    AssignedTo(String),
}

impl Assignment {
    pub fn handler(&self) -> Option<&str> {
        match self {
            Self::Unassigned => None,
            Self::AssignedTo(handler) => Some(handler),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str("unassigned"),
            Self::AssignedTo(handler) => f.write_str(handler),
        }
    }
}

/// A declared queue and its handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub queue_name: String,
    /// Logical id of the resource that declared the queue
    pub resource: String,
    pub assignment: Assignment,
}

/// Queue name -> handler table.
///
/// Only the resolver populates it; everything else gets a read-only view.
/// Every key was declared as a queue resource, and each queue has at most
/// one handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerMap {
    entries: Vec<QueueEntry>,
    index: HashMap<String, usize>,
}

impl HandlerMap {
    pub fn get(&self, queue_name: &str) -> Option<&QueueEntry> {
        self.index.get(queue_name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, queue_name: &str) -> bool {
        self.index.contains_key(queue_name)
    }

    /// Handler assigned to `queue_name`
    pub fn lookup(&self, queue_name: &str) -> Result<&str, LookupError> {
        let entry = self
            .get(queue_name)
            .ok_or_else(|| LookupError::UnknownQueue(queue_name.to_string()))?;

        entry
            .assignment
            .handler()
            .ok_or_else(|| LookupError::Unassigned(queue_name.to_string()))
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declare a queue. The first declaration of a name wins.
    pub(crate) fn register(&mut self, queue_name: &str, resource: &str) -> Result<(), ConfigError> {
        if let Some(existing) = self.get(queue_name) {
            return Err(ConfigError::DuplicateQueue {
                queue: queue_name.to_string(),
                resource: resource.to_string(),
                existing: existing.resource.clone(),
            });
        }

        self.index.insert(queue_name.to_string(), self.entries.len());
        self.entries.push(QueueEntry {
            queue_name: queue_name.to_string(),
            resource: resource.to_string(),
            assignment: Assignment::Unassigned,
        });
        Ok(())
    }

    /// Bind `function` to a declared queue. The first binding wins.
    pub(crate) fn assign(&mut self, queue_name: &str, function: &str) -> Result<(), ConfigError> {
        let Some(&i) = self.index.get(queue_name) else {
            return Err(ConfigError::UnknownQueue {
                function: function.to_string(),
                queue: queue_name.to_string(),
            });
        };

        let entry = &mut self.entries[i];
        match &entry.assignment {
            Assignment::AssignedTo(existing) => Err(ConfigError::HandlerConflict {
                queue: queue_name.to_string(),
                existing: existing.clone(),
                function: function.to_string(),
            }),
            Assignment::Unassigned => {
                entry.assignment = Assignment::AssignedTo(function.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_assign() {
        let mut map = HandlerMap::default();
        map.register("orders", "OrdersQueue").unwrap();

        assert_eq!(map.lookup("orders"), Err(LookupError::Unassigned("orders".to_string())));

        map.assign("orders", "svc-dev-process").unwrap();
        assert_eq!(map.lookup("orders"), Ok("svc-dev-process"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_duplicate_register_keeps_first() {
        let mut map = HandlerMap::default();
        map.register("orders", "First").unwrap();

        let err = map.register("orders", "Second").unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateQueue {
                queue: "orders".to_string(),
                resource: "Second".to_string(),
                existing: "First".to_string(),
            }
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("orders").unwrap().resource, "First");
    }

    #[test]
    fn test_second_handler_rejected() {
        let mut map = HandlerMap::default();
        map.register("orders", "OrdersQueue").unwrap();
        map.assign("orders", "first").unwrap();

        let err = map.assign("orders", "second").unwrap_err();
        assert!(matches!(err, ConfigError::HandlerConflict { ref existing, .. } if existing == "first"));
        assert_eq!(map.lookup("orders"), Ok("first"));
    }

    #[test]
    fn test_unknown_queue_is_not_created() {
        let mut map = HandlerMap::default();

        assert!(matches!(map.assign("ghost", "fn"), Err(ConfigError::UnknownQueue { .. })));
        assert!(!map.contains("ghost"));
        assert_eq!(map.lookup("ghost"), Err(LookupError::UnknownQueue("ghost".to_string())));
    }

    #[test]
    fn test_assignment_display() {
        assert_eq!(Assignment::Unassigned.to_string(), "unassigned");
        assert_eq!(Assignment::AssignedTo("fn".to_string()).to_string(), "fn");
    }
}
