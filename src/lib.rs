//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod bytes;
pub mod consts;
pub mod error;
mod iana;
pub mod ie;
pub mod message;
pub mod registry;
pub mod template;
pub mod types;

pub use error::{
    DecodeError, DecodeResult, EncodeError, EncodeResult, SpecError,
    SpecResult,
};
pub use ie::{InformationElement, InformationElementList};
pub use message::MessageBuffer;
pub use template::{Template, TemplatePackingPlan, TemplateRecord};
pub use types::{DataType, FieldValue, MacAddr};

// ===== macros =====

/// Asserts that two byte slices are equal, printing differences in hex
/// format if they are not.
#[macro_export]
macro_rules! assert_eq_hex {
    ($left:expr, $right:expr) => {
        if $left != $right {
            panic!(
                "assertion `left == right` failed\n  left: [{}]\n right: [{}]",
                $left
                    .iter()
                    .map(|b| format!("0x{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(", "),
                $right
                    .iter()
                    .map(|b| format!("0x{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    };
}
