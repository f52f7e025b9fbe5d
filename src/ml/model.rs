// ============================================================
// Layer 5 — Span Prediction Network
// ============================================================
// A BERT-style encoder that maps a token sequence to two score
// vectors: per-token start-likelihood and end-likelihood. The
// answer span is whatever the extraction policy makes of those
// two vectors — this module stops at the logits.
//
// The architecture is rebuilt from the hyperparameters stored
// next to the weights (see infra::model_store), so a differently
// sized pretrained model is a configuration change only.

use burn::{
    nn::{
        attention::{MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

#[derive(Config, Debug)]
pub struct SpanQaConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    /// Kept at 0.0 for inference; present so the module tree
    /// matches the shape the weights were recorded with.
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl SpanQaConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpanQaModel<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let layers: Vec<EncoderLayer<B>> = (0..self.num_layers)
            .map(|_| self.init_layer(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let span_head  = LinearConfig::new(self.d_model, 2).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        SpanQaModel {
            token_embedding, position_embedding, layers,
            final_norm, span_head, dropout,
            max_seq_len: self.max_seq_len,
        }
    }

    fn init_layer<B: Backend>(&self, device: &B::Device) -> EncoderLayer<B> {
        let self_attn = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        EncoderLayer {
            self_attn,
            ff_expand:   LinearConfig::new(self.d_model, self.d_ff).init(device),
            ff_contract: LinearConfig::new(self.d_ff, self.d_model).init(device),
            norm_attn:   LayerNormConfig::new(self.d_model).init(device),
            norm_ff:     LayerNormConfig::new(self.d_model).init(device),
            dropout:     DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// One post-norm encoder block: self-attention and a GELU
/// feed-forward, each wrapped in residual + layer norm.
#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    self_attn:   MultiHeadAttention<B>,
    ff_expand:   Linear<B>,
    ff_contract: Linear<B>,
    norm_attn:   LayerNorm<B>,
    norm_ff:     LayerNorm<B>,
    dropout:     Dropout,
}

impl<B: Backend> EncoderLayer<B> {
    fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        use burn::nn::attention::MhaInput;
        let attn = self.self_attn.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm_attn.forward(x + self.dropout.forward(attn));
        let ff = self.ff_contract.forward(
            burn::tensor::activation::gelu(self.ff_expand.forward(x.clone())),
        );
        self.norm_ff.forward(x + self.dropout.forward(ff))
    }
}

#[derive(Module, Debug)]
pub struct SpanQaModel<B: Backend> {
    token_embedding:    Embedding<B>,
    position_embedding: Embedding<B>,
    layers:             Vec<EncoderLayer<B>>,
    final_norm:         LayerNorm<B>,
    span_head:          Linear<B>,
    dropout:            Dropout,
    max_seq_len:        usize,
}

/// Per-token start/end logits, shape [batch, seq_len] each.
pub struct SpanScores<B: Backend> {
    pub start: Tensor<B, 2>,
    pub end:   Tensor<B, 2>,
}

impl<B: Backend> SpanQaModel<B> {
    /// Sequence length the position table was built for — inputs
    /// must be truncated to this before calling forward.
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// input_ids: [batch, seq_len] → start/end logits, one score
    /// per token position.
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> SpanScores<B> {
        let [batch_size, seq_len] = input_ids.dims();

        let tok_emb = self.token_embedding.forward(input_ids);

        // Self-attention is permutation-invariant, so position is
        // injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for layer in &self.layers {
            x = layer.forward(x);
        }
        let x = self.final_norm.forward(x); // [batch, seq_len, d_model]

        // Project to 2 logits per token, then split start / end.
        let logits = self.span_head.forward(x); // [batch, seq_len, 2]
        let start = logits.clone()
            .slice([0..batch_size, 0..seq_len, 0..1])
            .reshape([batch_size, seq_len]);
        let end = logits
            .slice([0..batch_size, 0..seq_len, 1..2])
            .reshape([batch_size, seq_len]);

        SpanScores { start, end }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;

    type B = burn::backend::NdArray;

    fn tiny_config() -> SpanQaConfig {
        SpanQaConfig::new(32, 16, 8, 2, 1, 16)
    }

    #[test]
    fn forward_shapes_match_input() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);

        let ids: Vec<i32> = vec![2, 5, 6, 3, 4, 3];
        let input = Tensor::<B, 1, Int>::from_ints(
            TensorData::new(ids, [6]), &device,
        ).unsqueeze::<2>();

        let scores = model.forward(input);
        assert_eq!(scores.start.dims(), [1, 6]);
        assert_eq!(scores.end.dims(), [1, 6]);
    }

    #[test]
    fn logits_are_finite() {
        let device = Default::default();
        let model = tiny_config().init::<B>(&device);

        let ids: Vec<i32> = (0..10).collect();
        let input = Tensor::<B, 1, Int>::from_ints(
            TensorData::new(ids, [10]), &device,
        ).unsqueeze::<2>();

        let scores = model.forward(input);
        let start: Vec<f32> = scores.start.into_data().to_vec().unwrap();
        assert!(start.iter().all(|v| v.is_finite()));
    }
}
