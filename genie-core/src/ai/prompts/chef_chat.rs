//! Free-form chat with the "AI Chef" about the recipe on screen.

use serde_json::Value;

/// Render the chat prompt from the user's message and optional recipe context.
///
/// String context is used verbatim; structured context is embedded as JSON.
pub fn render_chef_chat_prompt(message: &str, context: Option<&Value>) -> String {
    let context = match context {
        None | Some(Value::Null) => "No particular recipe.".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    format!(
        r#"You are a friendly and expert AI Chef.
The user is currently looking at this recipe:
{context}

User Query: "{message}"

Answer helpfully, briefly, and encouragingly. Focus on the query."#,
        context = context,
        message = message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_context_is_json() {
        let context = serde_json::json!({"dish_name": "Idli"});
        let prompt = render_chef_chat_prompt("Can I steam it longer?", Some(&context));
        assert!(prompt.contains(r#"{"dish_name":"Idli"}"#));
        assert!(prompt.contains("User Query: \"Can I steam it longer?\""));
    }

    #[test]
    fn test_string_context_verbatim() {
        let context = Value::String("Idli with sambar".to_string());
        let prompt = render_chef_chat_prompt("hi", Some(&context));
        assert!(prompt.contains("\nIdli with sambar\n"));
    }

    #[test]
    fn test_no_context() {
        let prompt = render_chef_chat_prompt("hi", None);
        assert!(prompt.contains("No particular recipe."));
    }
}
