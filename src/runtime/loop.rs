use crate::runtime::UiUpdate;
use tokio::sync::mpsc;

use super::{
    context::RuntimeContext,
    frontend::{FrontendAdapter, UserInputEvent},
    mode::RuntimeMode,
};

pub struct Runtime<M: RuntimeMode> {
    pub mode: M,
    update_rx: mpsc::UnboundedReceiver<UiUpdate>,
}

impl<M: RuntimeMode> Runtime<M> {
    pub fn new(mode: M, update_rx: mpsc::UnboundedReceiver<UiUpdate>) -> Self {
        Self { mode, update_rx }
    }

    /// Drives the frontend until it asks to quit: render, route one input
    /// event, then apply every settled reply.
    pub async fn run<F: FrontendAdapter<M>>(&mut self, frontend: &mut F, ctx: &mut RuntimeContext) {
        loop {
            frontend.render(&self.mode);
            if frontend.should_quit() {
                break;
            }

            if let Some(event) = frontend.poll_user_input(&self.mode) {
                self.dispatch(event, ctx);
            }
            self.drain_updates(ctx);

            tokio::task::yield_now().await;
        }
    }

    pub fn dispatch(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext) {
        match event {
            UserInputEvent::Text(input) => self.mode.on_submit(input, ctx),
            UserInputEvent::Choice(index) => self.mode.on_choice(index, ctx),
            UserInputEvent::Interrupt => self.mode.on_interrupt(ctx),
            other => self.mode.on_frontend_event(other, ctx),
        }
    }

    pub fn drain_updates(&mut self, ctx: &mut RuntimeContext) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                UiUpdate::TurnSettled { epoch, turn } => {
                    self.mode.on_turn_settled(epoch, turn, ctx)
                }
            }
        }
    }
}
