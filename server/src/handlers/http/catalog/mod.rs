pub mod api;
pub mod views;

pub use api::{
    create_pokemon, handle_create_page, handle_create_pokemon, handle_get_pokemon,
    handle_list_pokemons,
};
pub use views::{handle_home, handle_pokedex_detail, handle_pokedex_list};
