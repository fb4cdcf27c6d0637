//! Message templates with `{field}` placeholders.

use std::collections::HashMap;

use database::{Contact, ContactField};

use crate::Error;

/// Source of placeholder values.
pub trait ContactContext {
    /// Value for a placeholder, or `None` when the name is unknown.
    fn lookup(&self, placeholder: &str) -> Option<String>;
}

impl ContactContext for Contact {
    fn lookup(&self, placeholder: &str) -> Option<String> {
        // `{id}` is the associate ID, not the row ID.
        if placeholder == "id" {
            return Some(self.associate_id.clone());
        }
        match ContactField::from_str(placeholder)? {
            ContactField::Password => None,
            field => Some(self.text(field)),
        }
    }
}

impl ContactContext for HashMap<String, String> {
    fn lookup(&self, placeholder: &str) -> Option<String> {
        self.get(placeholder).cloned()
    }
}

/// Fill a template from a contact.
///
/// `{name}`, `{phone}`, `{level}` and the other field names are replaced by
/// the contact's values; `{{` and `}}` produce literal braces. Fails without
/// output on the first unknown placeholder or unbalanced brace.
pub fn render_template<C: ContactContext + ?Sized>(template: &str, context: &C) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(Error::MalformedTemplate {
                                position: pos,
                                reason: "nested '{' in placeholder",
                            })
                        }
                        c => name.push(c),
                    }
                }
                if !closed {
                    return Err(Error::MalformedTemplate {
                        position: pos,
                        reason: "unclosed '{'",
                    });
                }
                if name.is_empty() {
                    return Err(Error::MalformedTemplate {
                        position: pos,
                        reason: "empty placeholder",
                    });
                }
                let value = context
                    .lookup(&name)
                    .ok_or_else(|| Error::MissingField(name.clone()))?;
                out.push_str(&value);
            }
            '}' => {
                return Err(Error::MalformedTemplate {
                    position: pos,
                    reason: "unmatched '}'",
                })
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> HashMap<String, String> {
        HashMap::from([
            ("name".to_string(), "Jane".to_string()),
            ("level".to_string(), "3".to_string()),
        ])
    }

    #[test]
    fn test_replaces_placeholders() {
        let text = render_template("Hi {name}, you are level {level}!", &context()).unwrap();
        assert_eq!(text, "Hi Jane, you are level 3!");
    }

    #[test]
    fn test_escaped_braces() {
        let text = render_template("{{name}} is {name}", &context()).unwrap();
        assert_eq!(text, "{name} is Jane");
    }

    #[test]
    fn test_missing_field() {
        let err = render_template("Hi {nickname}", &context()).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref name) if name == "nickname"));
    }

    #[test]
    fn test_malformed_templates() {
        for (template, at) in [("Hi {name", 3), ("Hi name}", 7), ("Hi {}", 3), ("Hi {na{me}", 3)] {
            let err = render_template(template, &context()).unwrap_err();
            assert!(
                matches!(err, Error::MalformedTemplate { position, .. } if position == at),
                "{}: {:?}",
                template,
                err
            );
        }
    }

    #[test]
    fn test_contact_context() {
        let contact = Contact {
            id: 42,
            name: "Jane Doe".to_string(),
            phone: "0821234567".to_string(),
            level: Some(5),
            associate_id: "A-100".to_string(),
            password: "secret".to_string(),
            ..blank_contact()
        };

        let text = render_template("{name} ({id}) L{level} {phone}", &contact).unwrap();
        assert_eq!(text, "Jane Doe (A-100) L5 0821234567");
        assert!(matches!(
            render_template("{password}", &contact),
            Err(Error::MissingField(_))
        ));
    }

    fn blank_contact() -> Contact {
        Contact {
            id: 0,
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            source: String::new(),
            interest: String::new(),
            lead_status: String::new(),
            communication_status: String::new(),
            registration_status: String::new(),
            tags: String::new(),
            assigned: String::new(),
            notes: String::new(),
            action_needed: String::new(),
            action_taken: String::new(),
            username: String::new(),
            password: String::new(),
            country: String::new(),
            province: String::new(),
            city: String::new(),
            location: String::new(),
            level: None,
            leg: String::new(),
            associate_id: String::new(),
            member_status: "Active".to_string(),
            distributor_status: "Distributor".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
