pub mod core {
    pub mod ai;
    pub mod car;
    pub mod collision;
    pub mod cup;
    pub mod handle_race;
    pub mod input;
    pub mod parts;
    pub mod race;
    pub mod race_stats;
    pub mod session;
    pub mod shop;
    pub mod track;
}
pub mod error;
pub mod interfaces {
    pub mod hud_interface;
}
pub mod post {
    pub mod race_result;
}
pub mod pre {
    pub mod profile_store;
    pub mod read_sim_pars;
    pub mod sim_opts;
}
