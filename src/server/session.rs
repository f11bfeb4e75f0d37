use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::protocol::handlers::transfer_complete;
use crate::protocol::responses::{LOCAL_ERROR, UNKNOWN_COMMAND, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::storage::StorageService;
use crate::utils::validation::is_valid_input;

/// Outcome of reading one command line.
#[derive(Debug, PartialEq)]
enum InputLine {
    Eof,
    /// The line exceeded the limit; its remaining bytes were discarded.
    TooLong,
    Line,
}

/// Reads one `\n`-terminated line into `buf`, never buffering more than
/// `limit + 1` bytes of it. The terminator counts towards the limit.
async fn read_command_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> io::Result<InputLine>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader)
        .take(limit as u64 + 1)
        .read_until(b'\n', buf)
        .await?;

    if n == 0 {
        return Ok(InputLine::Eof);
    }
    if n > limit {
        if !buf.ends_with(b"\n") {
            discard_line(reader).await?;
        }
        buf.clear();
        return Ok(InputLine::TooLong);
    }
    Ok(InputLine::Line)
}

/// Skips input up to and including the next `\n`, or to EOF.
async fn discard_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

/// Runs one client session until QUIT, EOF or a socket error.
///
/// - Reads bounded command lines with a `BufReader`.
/// - Dispatches commands with `handle_command` on a blocking thread.
/// - Writes the response line, then streams any file and its completion line.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    config: &ServerConfig,
    service: Arc<StorageService>,
) -> io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    loop {
        match read_command_line(&mut reader, &mut buf, config.max_command_length).await? {
            InputLine::Eof => {
                info!("Connection closed by client {}", client_addr);
                return Ok(());
            }
            InputLine::TooLong => {
                warn!("Oversized command from {}", client_addr);
                write_half
                    .write_all(format_response(UNKNOWN_COMMAND, "Command too long").as_bytes())
                    .await?;
                continue;
            }
            InputLine::Line => {}
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                warn!("Non UTF-8 command from {}", client_addr);
                write_half
                    .write_all(
                        format_response(UNKNOWN_COMMAND, "Command is not valid UTF-8").as_bytes(),
                    )
                    .await?;
                continue;
            }
        };

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if !is_valid_input(trimmed) {
            write_half
                .write_all(format_response(UNKNOWN_COMMAND, "Unknown command").as_bytes())
                .await?;
            continue;
        }

        let command = parse_command(trimmed);
        info!("Received from {}: {:?}", client_addr, &command);

        let worker_service = Arc::clone(&service);
        let result =
            match tokio::task::spawn_blocking(move || handle_command(&worker_service, &command))
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    error!("Command handler for {} failed: {}", client_addr, e);
                    write_half
                        .write_all(
                            format_response(LOCAL_ERROR, "Requested action aborted").as_bytes(),
                        )
                        .await?;
                    continue;
                }
            };

        if let Some(msg) = &result.message {
            write_half.write_all(msg.as_bytes()).await?;
        }
        if let Some(transfer) = result.transfer {
            let file = tokio::fs::File::from_std(transfer.file);
            let sent = tokio::io::copy(&mut file.take(transfer.len), &mut write_half).await?;
            if sent != transfer.len {
                // The announced length can no longer be honoured.
                error!(
                    "Sent {} of {} bytes to {}, closing",
                    sent, transfer.len, client_addr
                );
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stored file shrank during transfer",
                ));
            }
            write_half.write_all(transfer_complete().as_bytes()).await?;
        }
        write_half.flush().await?;

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_lines_within_limit() {
        let mut input: &[u8] = b"LIST\r\nNOOP\r\n";
        let mut buf = Vec::new();

        assert_eq!(
            read_command_line(&mut input, &mut buf, 16).await.unwrap(),
            InputLine::Line
        );
        assert_eq!(buf, b"LIST\r\n");
        assert_eq!(
            read_command_line(&mut input, &mut buf, 16).await.unwrap(),
            InputLine::Line
        );
        assert_eq!(buf, b"NOOP\r\n");
        assert_eq!(
            read_command_line(&mut input, &mut buf, 16).await.unwrap(),
            InputLine::Eof
        );
    }

    #[tokio::test]
    async fn test_oversized_line_is_discarded_up_to_newline() {
        let mut raw = vec![b'x'; 100];
        raw.extend_from_slice(b"\r\nNOOP\r\n");
        let mut input: &[u8] = &raw;
        let mut buf = Vec::new();

        assert_eq!(
            read_command_line(&mut input, &mut buf, 16).await.unwrap(),
            InputLine::TooLong
        );
        assert!(buf.is_empty());
        assert_eq!(
            read_command_line(&mut input, &mut buf, 16).await.unwrap(),
            InputLine::Line
        );
        assert_eq!(buf, b"NOOP\r\n");
    }

    #[tokio::test]
    async fn test_terminator_counts_towards_limit() {
        let mut input: &[u8] = b"NOOP\r\n";
        let mut buf = Vec::new();

        assert_eq!(
            read_command_line(&mut input, &mut buf, 5).await.unwrap(),
            InputLine::TooLong
        );
        assert_eq!(
            read_command_line(&mut input, &mut buf, 5).await.unwrap(),
            InputLine::Eof
        );
    }

    #[tokio::test]
    async fn test_unterminated_final_line_is_returned() {
        let mut input: &[u8] = b"QUIT";
        let mut buf = Vec::new();

        assert_eq!(
            read_command_line(&mut input, &mut buf, 16).await.unwrap(),
            InputLine::Line
        );
        assert_eq!(buf, b"QUIT");
    }
}
