//! Login form widget.
//!
//! Renders [`LoginForm`] with its [`FieldErrors`], the [`LoginStatus`] banner and
//! the [`Notice`] raised by the help links. Input is written back to the state
//! context after the frame; actions are dispatched as commands.

use egui::{Align, Button, Key, Layout, Response, RichText, TextEdit, Ui};
use gatehouse_business::{
    AttemptState, DismissNoticeCommand, Field, FieldErrors, ForgotPasswordCommand, LoginForm,
    LoginStatus, MFA_CODE_LEN, NeedHelpCommand, Notice, SubmitLoginCommand,
};
use gatehouse_states::StateCtx;
use log::warn;

use crate::utils::colors::{COLOR_AMBER, COLOR_BLUE, COLOR_RED};

const FIELD_WIDTH: f32 = 280.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Submit,
    ForgotPassword,
    NeedHelp,
    DismissNotice,
}

/// Displays the login form and dispatches whatever the user asked for.
pub fn login_form(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let mut form = state_ctx.state::<LoginForm>().clone();
    let errors = state_ctx.state::<FieldErrors>().clone();
    let status = state_ctx.state::<LoginStatus>().clone();
    let notice = state_ctx.state::<Notice>().message.clone();
    let mfa_pending = state_ctx.state::<AttemptState>().mfa_pending();
    let submitting = state_ctx.is_running::<SubmitLoginCommand>();

    let mut action = None;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.heading("Welcome back");
            ui.add_space(12.0);

            status_banner(ui, &status);

            ui.allocate_ui(egui::vec2(FIELD_WIDTH, 0.0), |ui| {
                ui.with_layout(Layout::top_down(Align::Min), |ui| {
                    // Email
                    let label = ui.label("Email address");
                    let email = ui
                        .add(
                            TextEdit::singleline(&mut form.email)
                                .hint_text("you@company.com")
                                .desired_width(FIELD_WIDTH),
                        )
                        .labelled_by(label.id);
                    field_error(ui, &errors, Field::Email);
                    ui.add_space(8.0);

                    // Password
                    let show_id = ui.id().with("show_password");
                    let mut show_password =
                        ui.data(|d| d.get_temp::<bool>(show_id).unwrap_or(false));
                    let label = ui.label("Password");
                    let password = ui
                        .horizontal(|ui| {
                            let response = ui
                                .add(
                                    TextEdit::singleline(&mut form.password)
                                        .password(!show_password)
                                        .hint_text("At least 12 characters")
                                        .desired_width(FIELD_WIDTH - 56.0),
                                )
                                .labelled_by(label.id);
                            let toggle = if show_password { "Hide" } else { "Show" };
                            if ui.small_button(toggle).clicked() {
                                show_password = !show_password;
                            }
                            response
                        })
                        .inner;
                    ui.data_mut(|d| d.insert_temp(show_id, show_password));
                    field_error(ui, &errors, Field::Password);
                    ui.add_space(8.0);

                    // Verification code, only once the password step passed
                    let mut code_submitted = false;
                    if mfa_pending {
                        let label = ui.label("Verification code");
                        let code = ui
                            .add(
                                TextEdit::singleline(&mut form.mfa_code)
                                    .char_limit(MFA_CODE_LEN)
                                    .hint_text("6-digit code")
                                    .desired_width(FIELD_WIDTH),
                            )
                            .labelled_by(label.id);
                        field_error(ui, &errors, Field::MfaCode);
                        ui.add_space(8.0);
                        code_submitted = submitted_with_enter(ui, &code);
                    }

                    ui.checkbox(&mut form.remember_me, "Remember me");
                    ui.add_space(12.0);

                    let label = if submitting {
                        "Signing in..."
                    } else if mfa_pending {
                        "Verify"
                    } else {
                        "Sign In"
                    };
                    let can_submit = !submitting && !status.is_locked();
                    let clicked = ui
                        .add_enabled(
                            can_submit,
                            Button::new(label).min_size(egui::vec2(FIELD_WIDTH, 0.0)),
                        )
                        .clicked();

                    let entered = submitted_with_enter(ui, &email)
                        || submitted_with_enter(ui, &password)
                        || code_submitted;
                    if clicked || (can_submit && entered) {
                        action = Some(FormAction::Submit);
                    }
                });
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.link("Forgot password?").clicked() {
                    action = Some(FormAction::ForgotPassword);
                }
                ui.separator();
                if ui.link("Need help?").clicked() {
                    action = Some(FormAction::NeedHelp);
                }
            });

            if let Some(message) = &notice {
                ui.add_space(8.0);
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(COLOR_BLUE, message);
                    if ui.small_button("Dismiss").clicked() {
                        action = Some(FormAction::DismissNotice);
                    }
                });
            }
        })
        .response;

    // Update state if values changed
    let current = state_ctx.state_mut::<LoginForm>();
    if *current != form {
        *current = form;
    }

    if let Some(action) = action {
        let dispatched = match action {
            FormAction::Submit => state_ctx.dispatch::<SubmitLoginCommand>(),
            FormAction::ForgotPassword => state_ctx.dispatch::<ForgotPasswordCommand>(),
            FormAction::NeedHelp => state_ctx.dispatch::<NeedHelpCommand>(),
            FormAction::DismissNotice => state_ctx.dispatch::<DismissNoticeCommand>(),
        };
        if let Err(err) = dispatched {
            warn!("{action:?} ignored: {err}");
        }
    }

    response
}

fn submitted_with_enter(ui: &Ui, response: &Response) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter))
}

fn field_error(ui: &mut Ui, errors: &FieldErrors, field: Field) {
    if let Some(message) = errors.get(field) {
        ui.colored_label(COLOR_RED, RichText::new(message).small());
    }
}

fn status_banner(ui: &mut Ui, status: &LoginStatus) {
    match status {
        LoginStatus::Authenticating => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Authenticating...");
            });
        }
        LoginStatus::AwaitingMfa => {
            if let Some(message) = status.message() {
                ui.colored_label(COLOR_AMBER, message);
            }
        }
        LoginStatus::Rejected(message) | LoginStatus::Locked(message) => {
            ui.colored_label(COLOR_RED, message);
        }
        LoginStatus::Idle | LoginStatus::Authenticated { .. } => return,
    }
    ui.add_space(8.0);
}
