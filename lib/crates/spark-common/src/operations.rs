//! Static routing table for the tools the bridge exposes.
//!
//! Each operation maps one tool name onto one controller path. The table
//! is fixed for the lifetime of the process. Labels and descriptions live
//! on the tool registrations themselves.

/// The three operations forwarded to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ExecuteCommand,
    ManagePackage,
    GetSetting,
}

/// Tool name and controller path of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    /// Tool name as seen by the agent.
    pub name: &'static str,
    /// Path appended to the controller base URL.
    pub path: &'static str,
}

pub static OPERATIONS: [OperationDescriptor; 3] = [
    OperationDescriptor {
        operation: Operation::ExecuteCommand,
        name: "dgx_spark_exec",
        path: "/run_command",
    },
    OperationDescriptor {
        operation: Operation::ManagePackage,
        name: "dgx_spark_package",
        path: "/manage_package",
    },
    OperationDescriptor {
        operation: Operation::GetSetting,
        name: "dgx_spark_settings",
        path: "/get_settings",
    },
];

impl Operation {
    #[must_use]
    pub fn descriptor(self) -> &'static OperationDescriptor {
        match self {
            Operation::ExecuteCommand => &OPERATIONS[0],
            Operation::ManagePackage => &OPERATIONS[1],
            Operation::GetSetting => &OPERATIONS[2],
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        self.descriptor().path
    }
}
