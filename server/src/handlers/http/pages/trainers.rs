use shared::types::Collection;

use crate::database::Trainer;

use super::{escape_html, layout};

pub const TRAINERS_TITLE: &str = "Trainers";

/// Login and registration forms.
pub fn trainers_page() -> String {
    layout(
        TRAINERS_TITLE,
        r#"    <h1>Trainers</h1>
    <section>
      <h2>Register</h2>
      <form method="post" action="/api/register">
        <label>Username <input name="username" required></label>
        <label>Password <input name="password" type="password" required></label>
        <button type="submit">Register</button>
      </form>
    </section>
    <section>
      <h2>Login</h2>
      <form method="post" action="/api/login">
        <label>Username <input name="username" required></label>
        <label>Password <input name="password" type="password" required></label>
        <button type="submit">Login</button>
      </form>
    </section>"#,
    )
}

/// Profile of `trainer`, with the owned creatures resolved against
/// `pokemon_names` (`(id, name)` pairs) and a picker for adding more.
pub fn profile_page(trainer: &Trainer, pokemon_names: &[(i64, String)]) -> String {
    let collection: Collection = trainer.collection();

    let owned: String = if collection.is_empty() {
        "      <li>No Pokémon yet.</li>\n".to_string()
    } else {
        collection
            .iter()
            .map(|id| {
                let name = pokemon_names
                    .iter()
                    .find(|(known, _)| known.to_string() == id)
                    .map(|(_, name)| escape_html(name))
                    .unwrap_or_else(|| format!("#{}", escape_html(id)));
                format!("      <li>{}</li>\n", name)
            })
            .collect()
    };

    let options: String = pokemon_names
        .iter()
        .map(|(id, name)| format!("        <option value=\"{}\">{}</option>\n", id, escape_html(name)))
        .collect();

    let body = format!(
        r#"    <h1>{username}</h1>
    <p>Trainer #{id}</p>
    <h2>My Pokémon</h2>
    <ul>
{owned}    </ul>
    <h2>Add a Pokémon</h2>
    <form method="post" id="add-pokemon" data-action="/api/add_pokemon/">
      <select name="pokemon_id">
{options}      </select>
      <button type="submit">Add</button>
    </form>
    <p id="add-pokemon-result"></p>
    <script src="/static/profile.js"></script>"#,
        username = escape_html(&trainer.username),
        id = trainer.id,
    );

    layout(&format!("{} | Trainer", trainer.username), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn misty(pokemons: &str) -> Trainer {
        Trainer {
            id: 2,
            username: "misty".into(),
            password_hash: "$argon2id$...".into(),
            pokemons: pokemons.into(),
        }
    }

    #[test]
    fn profile_lists_owned_creatures_by_name() {
        let names = vec![(120, "Staryu".to_string()), (121, "Starmie".to_string())];
        let doc = profile_page(&misty("121"), &names);
        assert!(doc.contains("<li>Starmie</li>"));
        assert!(!doc.contains("<li>Staryu</li>"));
        assert!(doc.contains("<option value=\"120\">Staryu</option>"));
    }

    #[test]
    fn unknown_ids_fall_back_to_number() {
        let doc = profile_page(&misty("999"), &[]);
        assert!(doc.contains("<li>#999</li>"));
    }

    #[test]
    fn profile_never_shows_password_hash() {
        let doc = profile_page(&misty(""), &[]);
        assert!(!doc.contains("argon2"));
        assert!(doc.contains("No Pokémon yet."));
    }
}
