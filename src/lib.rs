// MassMailer - templated bulk email for Rust applications
//
// This library delivers a rendered template to a list of recipients through a
// pluggable mail facade and provides the attribute interface that scaffolded
// campaign attributes implement.

// Re-export member crates
pub use massmailer_attributes as attributes;
pub use massmailer_mail as mail;

// Prelude for common imports
pub mod prelude {
    pub use crate::attributes::{
        Attribute, AttributeParam, AttributeSet, AttributeValue, ComputedValue, DeclaredDefault,
    };
    pub use crate::mail::{
        Address, DefaultMailer, DeliveryLog, MailConfig, MailError, MailFacade, MailParams,
        MassMailer, Mailer, Message, Result, Transport,
    };

    #[cfg(feature = "handlebars")]
    pub use crate::mail::HandlebarsEngine;
}
