//! 问答边界
//!
//! 面试流程只通过 `Host` 的 `ask` / `tell` 与候选人交互，不关心界面是控制台还是测试脚本。
//! `ChannelHost` 用一对有界通道把流程和界面连起来，界面一侧持有 `HostHandle`。

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::HostError;

#[async_trait]
pub trait Host: Send {
    /// 提出问题并等待回答
    async fn ask(&mut self, question: &str) -> Result<String, HostError>;

    /// 展示一条消息，不需要回答
    async fn tell(&mut self, message: &str) -> Result<(), HostError>;
}

/// 流程发给界面的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// 需要候选人回答的问题
    Prompt(String),
    Notice(String),
}

/// 流程一侧
pub struct ChannelHost {
    events: mpsc::Sender<HostEvent>,
    answers: mpsc::Receiver<String>,
}

/// 界面一侧
pub struct HostHandle {
    events: mpsc::Receiver<HostEvent>,
    answers: mpsc::Sender<String>,
}

/// 创建一对相连的通道端点
pub fn channel_pair(capacity: usize) -> (ChannelHost, HostHandle) {
    let capacity = capacity.max(1);
    let (event_tx, event_rx) = mpsc::channel(capacity);
    let (answer_tx, answer_rx) = mpsc::channel(capacity);

    (
        ChannelHost {
            events: event_tx,
            answers: answer_rx,
        },
        HostHandle {
            events: event_rx,
            answers: answer_tx,
        },
    )
}

#[async_trait]
impl Host for ChannelHost {
    async fn ask(&mut self, question: &str) -> Result<String, HostError> {
        self.events
            .send(HostEvent::Prompt(question.to_string()))
            .await
            .map_err(|_| HostError::Disconnected)?;
        self.answers.recv().await.ok_or(HostError::Disconnected)
    }

    async fn tell(&mut self, message: &str) -> Result<(), HostError> {
        self.events
            .send(HostEvent::Notice(message.to_string()))
            .await
            .map_err(|_| HostError::Disconnected)
    }
}

impl HostHandle {
    /// 等待下一个事件，流程结束后返回 None
    pub async fn next_event(&mut self) -> Option<HostEvent> {
        self.events.recv().await
    }

    /// 回答最近一次 `Prompt`
    pub async fn answer(&self, text: impl Into<String>) -> Result<(), HostError> {
        self.answers
            .send(text.into())
            .await
            .map_err(|_| HostError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_round_trip() {
        let (mut host, mut handle) = channel_pair(1);

        let ui = tokio::spawn(async move {
            let event = handle.next_event().await;
            handle.answer("Ada").await.unwrap();
            event
        });

        let answer = host.ask("What is your name?").await.unwrap();

        assert_eq!(answer, "Ada");
        assert_eq!(
            ui.await.unwrap(),
            Some(HostEvent::Prompt("What is your name?".to_string()))
        );
    }

    #[tokio::test]
    async fn test_tell_sends_notice() {
        let (mut host, mut handle) = channel_pair(4);

        host.tell("Hello").await.unwrap();

        assert_eq!(handle.next_event().await, Some(HostEvent::Notice("Hello".to_string())));
    }

    #[tokio::test]
    async fn test_closed_ui_is_disconnected() {
        let (mut host, handle) = channel_pair(4);
        drop(handle);

        assert_eq!(host.tell("Hello").await, Err(HostError::Disconnected));
        assert_eq!(host.ask("Name?").await, Err(HostError::Disconnected));
    }

    #[tokio::test]
    async fn test_ui_dropping_answer_side_is_disconnected() {
        let (mut host, mut handle) = channel_pair(4);

        let ui = tokio::spawn(async move {
            // 收到问题后直接退出，不回答
            handle.next_event().await
        });

        assert_eq!(host.ask("Name?").await, Err(HostError::Disconnected));
        assert!(ui.await.unwrap().is_some());
    }
}
