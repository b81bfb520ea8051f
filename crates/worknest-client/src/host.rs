pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ADMIN_PATH: &str = "/admin";
pub const USER_PATH: &str = "/user";

/// Side effects a page can have on its surroundings.
pub trait PageHost {
    /// Navigate away from the current page.
    fn redirect(&mut self, path: &str);

    /// Ask the user a yes/no question. `false` cancels the action.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a blocking message.
    fn alert(&mut self, message: &str);
}
