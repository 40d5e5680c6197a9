use colored::*;
use dynbus_core::{
    Attribute, Catalog, GatewayError, IntrospectError, ResolveError,
    schema::{Arg, Method, Property},
    zbus,
};
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct GenericError<T: Display>(pub &'static str, pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<zbus::Error> for FormattedString {
    fn from(err: zbus::Error) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Connection Error:".red().bold(), err))
    }
}

impl From<IntrospectError<GatewayError>> for FormattedString {
    fn from(err: IntrospectError<GatewayError>) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Introspection Failed:".red().bold(),
            err
        ))
    }
}

impl From<ResolveError<GatewayError>> for FormattedString {
    fn from(err: ResolveError<GatewayError>) -> Self {
        let title = match err {
            ResolveError::NotFound(_) => "Name Lookup Failed:",
            ResolveError::Remote(_) => "Read Failed:",
        };
        FormattedString(format!("{}\n\n'{}'", title.red().bold(), err))
    }
}

impl From<GatewayError> for FormattedString {
    fn from(err: GatewayError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "D-Bus Call Failed:".red().bold(), err))
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<&Catalog> for FormattedString {
    fn from(catalog: &Catalog) -> Self {
        if catalog.methods().is_empty() && catalog.properties().is_empty() {
            return FormattedString("No methods or properties found.".yellow().to_string());
        }

        let mut out = String::new();
        out.push_str(&FormattedString::from(catalog.methods()).0);
        out.push('\n');
        out.push_str(&FormattedString::from(catalog.properties()).0);
        FormattedString(out.trim_end().to_string())
    }
}

impl From<&[Method]> for FormattedString {
    fn from(methods: &[Method]) -> Self {
        let mut out = String::new();
        out.push_str("Methods:\n");
        for method in methods {
            out.push_str(&format!("  {}\n", FormattedString::from(method).0));
        }
        FormattedString(out)
    }
}

impl From<&[Property]> for FormattedString {
    fn from(properties: &[Property]) -> Self {
        let mut out = String::new();
        out.push_str("Properties:\n");
        for property in properties {
            out.push_str(&format!("  {}\n", FormattedString::from(property).0));
        }
        FormattedString(out)
    }
}

impl From<&Method> for FormattedString {
    fn from(method: &Method) -> Self {
        let args = method
            .args
            .iter()
            .map(format_arg)
            .collect::<Vec<_>>()
            .join(", ");

        let response = match &method.response {
            Some(response) => format!(" {} {}", "->".cyan(), format_arg(response)),
            None => String::new(),
        };

        FormattedString(format!("{}({args}){response}", method.name.green()))
    }
}

impl From<&Property> for FormattedString {
    fn from(property: &Property) -> Self {
        FormattedString(format!(
            "{} {} {} ({})",
            property.name.green(),
            "->".cyan(),
            property.wire_type.to_string().yellow(),
            property.access.as_str().cyan()
        ))
    }
}

impl<G> From<Attribute<'_, G>> for FormattedString {
    fn from(attribute: Attribute<'_, G>) -> Self {
        match attribute {
            Attribute::Catalog(catalog) => FormattedString::from(catalog),
            Attribute::Methods(methods) => FormattedString::from(methods),
            Attribute::Properties(properties) => FormattedString::from(properties),
            Attribute::Method(invoker) => FormattedString::from(invoker.method()),
            Attribute::Field(value) => FormattedString::from(value.clone()),
            Attribute::Property(value) | Attribute::Metadata(value) => {
                FormattedString::from(value)
            }
        }
    }
}

fn format_arg(arg: &Arg) -> String {
    let wire_type = arg.wire_type.to_string().yellow();
    if arg.name.is_empty() {
        wire_type.to_string()
    } else {
        format!("{}: {wire_type}", arg.name)
    }
}
