//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use timeportal_auth::{Permission, Role};

use crate::config::WebConfig;
use crate::frontend::components::{
    AuthProvider, LoginPage, PermissionGate, ProtectedRoute, RoleBadge, use_auth,
};

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    let config = WebConfig::from_build_env();
    let routes = config.routes();
    let home = routes.home.clone();

    view! {
        <Router>
            <AuthProvider config=config>
                <Routes>
                    <Route path=routes.login view=LoginPage/>
                    <Route
                        path=routes.home
                        view=|| view! { <ProtectedRoute><DashboardPage/></ProtectedRoute> }
                    />
                    <Route
                        path=routes.users
                        view=|| {
                            view! {
                                <ProtectedRoute required_permissions=vec![Permission::VIEW_ALL_USERS]>
                                    <UsersPage/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route
                        path=routes.settings
                        view=|| {
                            view! {
                                <ProtectedRoute required_roles=vec![Role::Admin]>
                                    <SettingsPage/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route path="/" view=move || view! { <Redirect path=home.clone()/> }/>
                </Routes>
            </AuthProvider>
        </Router>
    }
}

/// Header with the signed-in user, their role and a logout button.
#[component]
fn SessionHeader() -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let routes = auth.config().routes();

    view! {
        <header>
            <h1>"Time Portal"</h1>
            {move || {
                state.get().user.map(|user| {
                    view! {
                        <span class="user-name">{user.name}</span>
                        <RoleBadge role=user.role/>
                    }
                })
            }}
            <nav>
                <A href=routes.home>"Dashboard"</A>
                <PermissionGate permissions=vec![Permission::VIEW_ALL_USERS]>
                    <A href=routes.users>"Users"</A>
                </PermissionGate>
                <PermissionGate permissions=vec![Permission::MANAGE_SETTINGS]>
                    <A href=routes.settings>"Settings"</A>
                </PermissionGate>
            </nav>
            <button on:click=move |_| auth.logout()>"Log out"</button>
        </header>
    }
}

#[component]
fn DashboardPage() -> impl IntoView {
    view! {
        <div class="app">
            <SessionHeader/>
            <main>
                <h2>"Dashboard"</h2>
                <PermissionGate
                    permissions=vec![Permission::VIEW_ALL_ENTRIES]
                    fallback=|| view! { <p>"Showing your own entries."</p> }
                >
                    <p>"Showing entries for every user."</p>
                </PermissionGate>
            </main>
        </div>
    }
}

#[component]
fn UsersPage() -> impl IntoView {
    view! {
        <div class="app">
            <SessionHeader/>
            <main>
                <h2>"Users"</h2>
                <PermissionGate permissions=vec![Permission::MANAGE_USERS]>
                    <button class="add-user">"Add user"</button>
                </PermissionGate>
                <PermissionGate
                    permissions=vec![Permission::DELETE_USERS, Permission::MANAGE_ROLES]
                    require_all=true
                >
                    <button class="bulk-delete">"Delete selected"</button>
                </PermissionGate>
            </main>
        </div>
    }
}

#[component]
fn SettingsPage() -> impl IntoView {
    view! {
        <div class="app">
            <SessionHeader/>
            <main>
                <h2>"Settings"</h2>
            </main>
        </div>
    }
}
