//! Interactive terminal client: one TCP request per menu action.

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines, Stdin},
    net::TcpStream,
};

use crate::server::request::Request;

const MENU: &str = "Choose an action:\n1. Show status\n2. Send message\n3. Read chat\n4. Quit";

pub struct ChatClient {
    client_name: String,
    host: String,
    port: u16,
}

impl ChatClient {
    pub fn new(client_name: String, host: String, port: u16) -> Self {
        Self {
            client_name,
            host,
            port,
        }
    }

    /// Sends one request and returns the server's response string.
    ///
    /// The write side is half-closed after the payload so the server sees
    /// EOF, then the full response is read until the server closes.
    async fn request(&self, request: &Request) -> Result<String> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("failed to connect to {}:{}", self.host, self.port))?;

        let payload = serde_json::to_vec(request).context("failed to encode request")?;
        stream
            .write_all(&payload)
            .await
            .context("failed to send request")?;
        stream
            .shutdown()
            .await
            .context("failed to finish request")?;

        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .context("failed to read response")?;
        Ok(response)
    }

    pub async fn connect_user(&self) -> Result<String> {
        self.request(&Request::connect(&self.client_name)).await
    }

    pub async fn status(&self) -> Result<String> {
        self.request(&Request::status(&self.client_name)).await
    }

    pub async fn send_message(&self, text: &str, recipient: &str) -> Result<String> {
        self.request(&Request::send(&self.client_name, text, recipient))
            .await
    }

    pub async fn read_chat(&self, chat_name: &str) -> Result<String> {
        self.request(&Request::read_chat(&self.client_name, chat_name))
            .await
    }

    /// Registers with the server, then loops over the action menu until the
    /// user quits or stdin closes.
    pub async fn run_session(&self) -> Result<()> {
        println!("{}", self.connect_user().await?);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            println!("{MENU}");
            let Some(choice) = lines.next_line().await.context("failed to read input")? else {
                break;
            };
            match choice.trim() {
                "1" => println!("{}", self.status().await?),
                "2" => {
                    let text = loop {
                        let candidate = prompt(&mut lines, "Message: ").await?;
                        if !candidate.is_empty() {
                            break candidate;
                        }
                    };
                    let recipient =
                        prompt(&mut lines, "To (empty for the common chat): ").await?;
                    println!("{}", self.send_message(&text, &recipient).await?);
                }
                "3" => {
                    let chat_name = prompt(&mut lines, "Chat name: ").await?;
                    println!("{}", self.read_chat(&chat_name).await?);
                }
                "4" => break,
                _ => continue,
            }
        }
        Ok(())
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    print!("{label}");
    std::io::Write::flush(&mut std::io::stdout()).context("failed to flush stdout")?;
    let line = lines
        .next_line()
        .await
        .context("failed to read input")?
        .context("input stream closed")?;
    Ok(line.trim().to_owned())
}
