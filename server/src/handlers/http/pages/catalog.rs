use crate::database::Pokemon;

use super::{escape_html, layout};

pub const HOME_TITLE: &str = "My Pokedex";
pub const LIST_TITLE: &str = "Všetci Pokémoni na jednom mieste | Pokédex";
pub const NOT_FOUND_TITLE: &str = "Pokémon sa nenašiel | Pokédex";
pub const CREATE_TITLE: &str = "Creating Pokémon";

pub fn home_page() -> String {
    layout(
        HOME_TITLE,
        r#"    <h1>My Pokedex</h1>
    <p>Browse the <a href="/pokedex">Pokédex</a> or sign in on the <a href="/api/trainers">trainers</a> page.</p>"#,
    )
}

fn types_of(pokemon: &Pokemon) -> String {
    match &pokemon.type2 {
        Some(type2) => format!("{} / {}", escape_html(&pokemon.type1), escape_html(type2)),
        None => escape_html(&pokemon.type1),
    }
}

pub fn pokemon_list_page(pokemons: &[Pokemon]) -> String {
    let rows: String = pokemons
        .iter()
        .map(|p| {
            format!(
                "      <tr><td>#{dex}</td><td><a href=\"/pokedex/{dex}\">{name}</a></td><td>{class}</td><td>{types}</td></tr>\n",
                dex = p.pokedex_number,
                name = escape_html(&p.name),
                class = escape_html(&p.classification),
                types = types_of(p),
            )
        })
        .collect();

    let body = format!(
        r#"    <h1>Pokédex</h1>
    <table>
      <tr><th>#</th><th>Name</th><th>Classification</th><th>Type</th></tr>
{rows}    </table>"#
    );

    layout(LIST_TITLE, &body)
}

pub fn pokemon_detail_page(pokemon: &Pokemon) -> String {
    let body = format!(
        r#"    <h1>{name} <small>#{dex}</small></h1>
    <dl>
      <dt>Classification</dt><dd>{class}</dd>
      <dt>Type</dt><dd>{types}</dd>
    </dl>
    <p><a href="/pokedex">Back to the list</a></p>"#,
        name = escape_html(&pokemon.name),
        dex = pokemon.pokedex_number,
        class = escape_html(&pokemon.classification),
        types = types_of(pokemon),
    );

    layout(&format!("{} | Pokédex", pokemon.name), &body)
}

pub fn pokemon_not_found_page() -> String {
    layout(
        NOT_FOUND_TITLE,
        r#"    <h1>Pokémon sa nenašiel</h1>
    <p><a href="/pokedex">Späť na zoznam</a></p>"#,
    )
}

pub fn create_pokemon_page() -> String {
    layout(
        CREATE_TITLE,
        r#"    <h1>Creating Pokémon</h1>
    <form method="post" action="/api/create">
      <label>Name <input name="name" required></label>
      <label>Pokédex number <input name="pokedex_number" type="number" required></label>
      <label>Classification <input name="classification" required></label>
      <label>Type 1 <input name="type1" required></label>
      <label>Type 2 <input name="type2"></label>
      <button type="submit">Create</button>
    </form>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> Pokemon {
        Pokemon {
            id: 1,
            name: "Bulbasaur".into(),
            pokedex_number: 1,
            classification: "Seed Pokémon".into(),
            type1: "grass".into(),
            type2: Some("poison".into()),
        }
    }

    #[test]
    fn detail_title_uses_name() {
        let doc = pokemon_detail_page(&bulbasaur());
        assert!(doc.contains("<title>Bulbasaur | Pokédex</title>"));
        assert!(doc.contains("grass / poison"));
    }

    #[test]
    fn list_links_each_record_by_dex_number() {
        let doc = pokemon_list_page(&[bulbasaur()]);
        assert!(doc.contains(LIST_TITLE));
        assert!(doc.contains("href=\"/pokedex/1\""));
    }

    #[test]
    fn names_are_escaped() {
        let mut p = bulbasaur();
        p.name = "<script>".into();
        assert!(!pokemon_list_page(&[p]).contains("<script>"));
    }
}
