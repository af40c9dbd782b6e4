fn main() {
    prep_portal_frontend::start_app();
}
